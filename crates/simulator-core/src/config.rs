/// Attach-time behavior of a [`crate::Tpm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct TpmConfig {
    /// Runs power-on, manufacture reset and startup when attaching.
    pub boot_on_attach: bool,
    /// Publishes an initial snapshot when attaching.
    pub snapshot_on_attach: bool,
}

impl Default for TpmConfig {
    fn default() -> Self {
        Self {
            boot_on_attach: true,
            snapshot_on_attach: true,
        }
    }
}
