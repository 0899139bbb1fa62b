use crate::buffer::decode;
use crate::engine::SimulatorPort;
use crate::error::EngineError;

/// Number of PCRs captured in a snapshot.
pub const SNAPSHOT_PCR_COUNT: usize = 4;

/// UI-visible view of the engine: lifecycle flags, boot counter, PCR 0..3
/// of the SHA-256 bank and the four hierarchy seeds.
///
/// Never cached; each capture re-reads the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SimulatorSnapshot {
    /// Platform power is on.
    pub powered_on: bool,
    /// Manufacture reset has run.
    pub manufactured: bool,
    /// `TPM2_Startup` has completed in this power cycle.
    pub started: bool,
    /// Startups since manufacture.
    pub boot_counter: u32,
    /// PCR values in index order.
    pub pcrs: [Vec<u8>; SNAPSHOT_PCR_COUNT],
    /// Endorsement primary seed.
    pub endorsement_seed: Vec<u8>,
    /// Platform primary seed.
    pub platform_seed: Vec<u8>,
    /// Storage (owner) primary seed.
    pub owner_seed: Vec<u8>,
    /// Null hierarchy seed; changes on every reset.
    pub null_seed: Vec<u8>,
}

impl SimulatorSnapshot {
    /// Reads every snapshot field from `port` in one pass.
    ///
    /// # Errors
    ///
    /// Returns the first failed read; no partial snapshot is produced.
    pub fn capture<P: SimulatorPort + ?Sized>(port: &P) -> Result<Self, EngineError> {
        let mut pcrs: [Vec<u8>; SNAPSHOT_PCR_COUNT] = Default::default();
        for (index, slot) in (0_u32..).zip(pcrs.iter_mut()) {
            *slot = decode(&port.pcr(index)?);
        }
        Ok(Self {
            powered_on: port.is_powered_on(),
            manufactured: port.is_manufactured(),
            started: port.is_started(),
            boot_counter: port.boot_counter()?,
            pcrs,
            endorsement_seed: decode(&port.endorsement_seed()?),
            platform_seed: decode(&port.platform_seed()?),
            owner_seed: decode(&port.owner_seed()?),
            null_seed: decode(&port.null_seed()?),
        })
    }
}

/// Receives every snapshot produced by a refresh.
pub trait SnapshotSink {
    /// Publishes a freshly captured snapshot.
    fn publish(&mut self, snapshot: &SimulatorSnapshot);
}

/// Sink that drops every snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopSnapshotSink;

impl SnapshotSink for NoopSnapshotSink {
    fn publish(&mut self, _snapshot: &SimulatorSnapshot) {}
}

impl<F: FnMut(&SimulatorSnapshot)> SnapshotSink for F {
    fn publish(&mut self, snapshot: &SimulatorSnapshot) {
        self(snapshot);
    }
}
