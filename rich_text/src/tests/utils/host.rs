// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::config::RenderConfig;
use crate::font::ResourceManager;
use crate::host::{RootView, UiScheduler, UiTask};

/// A UI queue drained explicitly by the test, standing in for the UI thread.
#[derive(Default)]
pub(crate) struct ManualQueue {
    tasks: Mutex<VecDeque<UiTask>>,
}

impl ManualQueue {
    pub(crate) fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Runs tasks, including ones they post, until the queue is empty.
    pub(crate) fn run_all(&self) -> usize {
        let mut ran = 0;
        loop {
            let Some(task) = self.tasks.lock().pop_front() else {
                return ran;
            };
            task();
            ran += 1;
        }
    }
}

impl UiScheduler for ManualQueue {
    fn run_on_ui(&self, task: UiTask) {
        self.tasks.lock().push_back(task);
    }
}

#[derive(Default)]
pub(crate) struct MemoryResources {
    pub(crate) files: HashMap<String, Vec<u8>>,
}

impl ResourceManager for MemoryResources {
    fn read_raw_file(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_owned()))
    }
}

pub(crate) struct TestRoot {
    pub(crate) config: RenderConfig,
    pub(crate) queue: Arc<ManualQueue>,
    pub(crate) resources: Option<Arc<dyn ResourceManager>>,
}

impl TestRoot {
    pub(crate) fn new(density: f32) -> Arc<Self> {
        Arc::new(Self {
            config: RenderConfig::with_density(density),
            queue: Arc::new(ManualQueue::default()),
            resources: None,
        })
    }
}

impl RootView for TestRoot {
    fn config(&self) -> RenderConfig {
        self.config
    }

    fn resource_manager(&self) -> Option<Arc<dyn ResourceManager>> {
        self.resources.clone()
    }

    fn scheduler(&self) -> Arc<dyn UiScheduler> {
        self.queue.clone()
    }
}
