// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seams to the hosting view tree and its UI thread.

use std::sync::{Arc, Weak};

use crate::config::RenderConfig;
use crate::font::ResourceManager;

/// A unit of work for the UI thread.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Runs closures on the UI thread.
///
/// Tasks posted through one scheduler run in posting order.
pub trait UiScheduler: Send + Sync {
    /// Posts `task` to the UI thread.
    fn run_on_ui(&self, task: UiTask);
}

/// The root of a rendered view tree.
pub trait RootView: Send + Sync {
    /// Current density and accessibility scales.
    fn config(&self) -> RenderConfig;
    /// Access to bundled files, if the host has any.
    fn resource_manager(&self) -> Option<Arc<dyn ResourceManager>>;
    /// The UI thread of this tree.
    fn scheduler(&self) -> Arc<dyn UiScheduler>;
}

/// A strong root view reference taken off the UI thread.
///
/// What the context thread needs from the root is read once, when the guard
/// is taken. On drop the reference is handed to the UI thread, so that if it
/// was the last one the root view is torn down there and not on the calling
/// thread.
pub struct RootViewGuard {
    root: Option<Arc<dyn RootView>>,
    config: RenderConfig,
    resources: Option<Arc<dyn ResourceManager>>,
    scheduler: Arc<dyn UiScheduler>,
}

impl core::fmt::Debug for RootViewGuard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RootViewGuard")
            .field("config", &self.config)
            .field("resources", &self.resources.is_some())
            .finish_non_exhaustive()
    }
}

impl RootViewGuard {
    /// Upgrades `root`, or returns `None` once the root view is gone.
    pub fn lock(root: &Weak<dyn RootView>) -> Option<Self> {
        let root = root.upgrade()?;
        Some(Self {
            config: root.config(),
            resources: root.resource_manager(),
            scheduler: root.scheduler(),
            root: Some(root),
        })
    }

    /// Density and accessibility scales of the root view.
    pub fn config(&self) -> RenderConfig {
        self.config
    }

    /// Bundled file access of the root view.
    pub fn resource_manager(&self) -> Option<&dyn ResourceManager> {
        self.resources.as_deref()
    }

    /// The UI thread of the root view.
    pub fn scheduler(&self) -> &dyn UiScheduler {
        self.scheduler.as_ref()
    }
}

impl Drop for RootViewGuard {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            self.scheduler.run_on_ui(Box::new(move || drop(root)));
        }
    }
}
