//! Simulator lifecycle primitives, composite operator actions and refresh.
//!
//! Lifecycle: unpowered, powered on, manufactured, started. The engine
//! enforces the transitions; this layer only sequences them.

use std::fmt;

use log::{info, warn};

use crate::command::Tpm;
use crate::engine::Engine;
use crate::error::Error;
use crate::snapshot::SimulatorSnapshot;

/// One engine-level lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum LifecycleStep {
    /// Platform power on.
    PowerOn,
    /// Platform power off.
    PowerOff,
    /// Manufacture reset of persistent state.
    ManufactureReset,
    /// `TPM2_Startup(CLEAR)`.
    Startup,
    /// `TPM2_Shutdown(CLEAR)`.
    Shutdown,
    /// `TPM2_Clear` on the platform hierarchy.
    Clear,
}

impl fmt::Display for LifecycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PowerOn => "PowerOn",
            Self::PowerOff => "PowerOff",
            Self::ManufactureReset => "ManufactureReset",
            Self::Startup => "Startup",
            Self::Shutdown => "Shutdown",
            Self::Clear => "Clear",
        })
    }
}

pub(crate) const BOOT_STEPS: &[LifecycleStep] = &[
    LifecycleStep::PowerOn,
    LifecycleStep::ManufactureReset,
    LifecycleStep::Startup,
];

/// Operator actions from the system menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum SystemAction {
    /// Orderly shutdown followed by a power cycle and startup.
    Restart,
    /// Platform clear followed by a restart.
    Clear,
    /// Power cycle around a manufacture reset, then startup.
    ManufactureReset,
}

impl SystemAction {
    /// Returns the fixed step sequence of the action.
    #[must_use]
    pub const fn steps(self) -> &'static [LifecycleStep] {
        use LifecycleStep::{Clear, ManufactureReset, PowerOff, PowerOn, Shutdown, Startup};
        match self {
            Self::Restart => &[Shutdown, PowerOff, PowerOn, Startup],
            Self::Clear => &[Clear, Shutdown, PowerOff, PowerOn, Startup],
            Self::ManufactureReset => &[
                PowerOff,
                PowerOn,
                ManufactureReset,
                PowerOff,
                PowerOn,
                Startup,
            ],
        }
    }
}

impl<E: Engine> Tpm<E> {
    /// Raises platform power.
    ///
    /// # Errors
    ///
    /// Propagates engine refusals.
    pub fn power_on(&mut self) -> Result<(), Error> {
        self.apply(LifecycleStep::PowerOn)
    }

    /// Drops platform power.
    ///
    /// # Errors
    ///
    /// Propagates engine refusals.
    pub fn power_off(&mut self) -> Result<(), Error> {
        self.apply(LifecycleStep::PowerOff)
    }

    /// Wipes persistent state and installs fresh seeds.
    ///
    /// # Errors
    ///
    /// Propagates engine refusals.
    pub fn manufacture_reset(&mut self) -> Result<(), Error> {
        self.apply(LifecycleStep::ManufactureReset)
    }

    /// Runs `TPM2_Startup(CLEAR)` and refreshes on success.
    ///
    /// # Errors
    ///
    /// Propagates engine failures and lifecycle refusals, then refresh
    /// failures. No refresh happens on failure.
    pub fn startup(&mut self) -> Result<(), Error> {
        self.apply(LifecycleStep::Startup)?;
        self.refresh()?;
        Ok(())
    }

    /// Runs `TPM2_Shutdown(CLEAR)`.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        self.apply(LifecycleStep::Shutdown)
    }

    /// Re-reads the engine, publishes the snapshot and returns it.
    ///
    /// # Errors
    ///
    /// Returns the failed read; nothing is published in that case.
    pub fn refresh(&mut self) -> Result<SimulatorSnapshot, Error> {
        let snapshot = SimulatorSnapshot::capture(&self.engine).map_err(|err| {
            warn!(target: "tpm::lifecycle", "refresh: {err}");
            Error::from(err)
        })?;
        self.sink.publish(&snapshot);
        Ok(snapshot)
    }

    /// Powers on, manufactures and starts the TPM, then refreshes.
    ///
    /// # Errors
    ///
    /// Returns the first step error after every step has run, otherwise
    /// any refresh failure.
    pub fn boot(&mut self) -> Result<SimulatorSnapshot, Error> {
        info!(target: "tpm::lifecycle", "boot");
        let outcome = self.run_steps(BOOT_STEPS);
        let snapshot = self.refresh();
        outcome.and(snapshot)
    }

    /// Runs an operator action, refreshing once at the end.
    ///
    /// Every step runs regardless of earlier failures.
    ///
    /// # Errors
    ///
    /// Returns the first step error, after the refresh, otherwise any
    /// refresh failure.
    pub fn run_action(&mut self, action: SystemAction) -> Result<SimulatorSnapshot, Error> {
        info!(target: "tpm::lifecycle", "system action {action:?}");
        let outcome = self.run_steps(action.steps());
        let snapshot = self.refresh();
        outcome.and(snapshot)
    }

    pub(crate) fn run_steps(&mut self, steps: &[LifecycleStep]) -> Result<(), Error> {
        let mut first_error = None;
        for &step in steps {
            if let Err(err) = self.apply(step) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn apply(&mut self, step: LifecycleStep) -> Result<(), Error> {
        info!(target: "tpm::lifecycle", "{step}");
        match step {
            LifecycleStep::PowerOn => self.dispatch("PowerOn", |engine| engine.power_on()),
            LifecycleStep::PowerOff => self.dispatch("PowerOff", |engine| engine.power_off()),
            LifecycleStep::ManufactureReset => {
                self.dispatch("ManufactureReset", |engine| engine.manufacture_reset())
            }
            LifecycleStep::Startup => self.dispatch("Startup", |engine| engine.startup()),
            LifecycleStep::Shutdown => self.dispatch("Shutdown", |engine| engine.shutdown()),
            LifecycleStep::Clear => self.dispatch("Clear", |engine| engine.clear()),
        }
    }
}
