use std::sync::Arc;

use crate::adapter::AdapterRegistry;
use crate::capability::{probe, CapabilitySet, EntryPointLookup};
use crate::config::{CompatConfig, SchedulerModeSetting};
use crate::facade::Facade;
use crate::kernel::constants;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::scheduler::{SchedulerMode, SchedulingBridge};

/// The assembled compatibility layer.
///
/// Built once at startup in a fixed order: probe the host for modules,
/// bind adapters, start the scheduling bridge, then hand out the facade.
/// Nothing here is rebuilt later; picking up a new module takes a restart.
#[derive(Debug)]
pub struct Application {
    config: CompatConfig,
    capabilities: Arc<CapabilitySet>,
    registry: Arc<AdapterRegistry>,
    bridge: Arc<SchedulingBridge>,
    facade: Facade,
}

/// Resolve the configured scheduler mode against what the host offers.
pub fn scheduler_mode(setting: SchedulerModeSetting, lookup: &dyn EntryPointLookup) -> SchedulerMode {
    match setting {
        SchedulerModeSetting::Auto => SchedulerMode::detect(lookup),
        SchedulerModeSetting::Global => SchedulerMode::GlobalTick,
        SchedulerModeSetting::Region => SchedulerMode::RegionParallel,
    }
}

impl Application {
    /// Probe, bind and start everything.
    ///
    /// Missing or incompatible modules never fail the bootstrap; only an
    /// invalid configuration or a scheduler that cannot start its threads does.
    /// The configuration is validated here even when it was built in code.
    pub fn bootstrap(config: CompatConfig, lookup: Box<dyn EntryPointLookup>) -> Result<Self> {
        log::info!("Starting {} v{} with {}", constants::APP_NAME, constants::APP_VERSION, lookup.describe());

        config
            .validate()
            .map_err(|e| Error::lifecycle(KernelLifecyclePhase::Probe, "invalid configuration", Some(e.into())))?;
        let known = config
            .known_capabilities()
            .map_err(|e| Error::lifecycle(KernelLifecyclePhase::Probe, "invalid capability list", Some(e.into())))?;
        let capabilities = Arc::new(probe(&known, lookup.as_ref()));

        let registry = Arc::new(AdapterRegistry::build(&capabilities));
        for warning in registry.warnings() {
            log::warn!("Degraded mode: {}", warning);
        }

        let mode = scheduler_mode(config.scheduler.mode, lookup.as_ref());
        let bridge = SchedulingBridge::new(mode, config.scheduler.worker_count(), config.scheduler.region_shift)
            .map_err(|e| {
                Error::lifecycle(KernelLifecyclePhase::Schedule, "failed to start scheduling bridge", Some(e.into()))
            })?;
        let bridge = Arc::new(bridge);
        log::info!("Scheduling bridge running in {} mode", bridge.mode());

        let facade = Facade::new(Arc::clone(&registry), Arc::clone(&bridge));
        log::info!(
            "{} ready: {} of {} capabilities live",
            constants::APP_NAME,
            registry.states().filter(|(_, state)| state.is_live()).count(),
            registry.states().count()
        );

        Ok(Self { config, capabilities, registry, bridge, facade })
    }

    pub fn config(&self) -> &CompatConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub fn bridge(&self) -> &SchedulingBridge {
        &self.bridge
    }

    /// Cheap handle onto the facade; clones share the same bindings.
    pub fn facade(&self) -> Facade {
        self.facade.clone()
    }

    /// Stop the scheduling bridge. Outstanding work resolves with `ShutDown`.
    pub fn shutdown(&self) {
        log::info!("Shutting down {}", constants::APP_NAME);
        self.bridge.shutdown();
    }
}
