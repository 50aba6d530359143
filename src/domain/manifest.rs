use crate::error::{EscrowError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger address in `0x` + 40 hex digit form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn parse(s: &str) -> Result<Self> {
        let hex_part = s
            .strip_prefix("0x")
            .filter(|h| h.len() == 40 && h.chars().all(|c| c.is_ascii_hexdigit()));
        match hex_part {
            Some(_) => Ok(Self(s.to_string())),
            None => Err(EscrowError::InvalidManifest(format!(
                "malformed ledger address: {s}"
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum JobMode {
    Batch,
    Online,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    ImageLabelBinary,
    ImageLabelMultipleChoice,
}

/// Validated specification of a task batch, its pricing, and its oracles.
///
/// Built once from untrusted input; `validate` must succeed before the
/// manifest is handed to an `EscrowContract`, and the record is treated as
/// immutable from then on. Money fields keep their original decimal values;
/// conversion to on-chain units happens only at the ledger boundary.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Manifest {
    pub job_mode: JobMode,
    pub request_type: RequestType,
    /// Price paid per completed task, in decimal currency units.
    pub task_bid_price: Decimal,
    /// Fraction of the task value staked by each oracle (0.05 = 5%).
    pub oracle_stake: Decimal,
    pub job_total_tasks: u64,
    pub minimum_trust_server: Decimal,
    pub minimum_trust_client: Decimal,
    pub recording_oracle_addr: Address,
    pub reputation_oracle_addr: Address,
    /// Webhook invoked when results are delivered.
    pub instant_result_delivery_webhook: String,
    /// Location of the task data the workers will label.
    pub taskdata_uri: String,
}

fn has_cent_resolution(value: Decimal) -> bool {
    value.normalize().scale() <= 2
}

fn is_uri(value: &str) -> bool {
    ["http://", "https://", "file://"]
        .iter()
        .any(|scheme| value.starts_with(scheme))
}

impl Manifest {
    /// Checks every schema rule; a manifest that passes is safe to deploy.
    ///
    /// A non-positive bid price is rejected here even though the system this
    /// replaces accepted one: an escrow funded against a negative bid can
    /// never reconcile.
    pub fn validate(&self) -> Result<()> {
        if self.task_bid_price <= Decimal::ZERO {
            return Err(EscrowError::InvalidManifest(
                "task_bid_price must be positive".to_string(),
            ));
        }
        if !has_cent_resolution(self.task_bid_price) {
            return Err(EscrowError::InvalidManifest(
                "task_bid_price must be representable at two decimal places".to_string(),
            ));
        }
        if self.oracle_stake <= Decimal::ZERO || self.oracle_stake >= Decimal::ONE {
            return Err(EscrowError::InvalidManifest(
                "oracle_stake must be a fraction strictly between 0 and 1".to_string(),
            ));
        }
        if !has_cent_resolution(self.oracle_stake) {
            return Err(EscrowError::InvalidManifest(
                "oracle_stake must be representable at two decimal places".to_string(),
            ));
        }
        if self.job_total_tasks == 0 {
            return Err(EscrowError::InvalidManifest(
                "job_total_tasks must be positive".to_string(),
            ));
        }
        for (field, trust) in [
            ("minimum_trust_server", self.minimum_trust_server),
            ("minimum_trust_client", self.minimum_trust_client),
        ] {
            if trust < Decimal::ZERO || trust > Decimal::ONE {
                return Err(EscrowError::InvalidManifest(format!(
                    "{field} must lie within [0, 1]"
                )));
            }
        }
        if !is_uri(&self.taskdata_uri) {
            return Err(EscrowError::InvalidManifest(
                "taskdata_uri must carry a recognized scheme".to_string(),
            ));
        }
        if !is_uri(&self.instant_result_delivery_webhook) {
            return Err(EscrowError::InvalidManifest(
                "instant_result_delivery_webhook must carry a recognized scheme".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fixture used across the unit test suites: bid 1.0, stake 0.05, 100 tasks.
#[cfg(test)]
pub(crate) fn sample_manifest() -> Manifest {
    use rust_decimal_macros::dec;

    Manifest {
        job_mode: JobMode::Batch,
        request_type: RequestType::ImageLabelBinary,
        task_bid_price: dec!(1.0),
        oracle_stake: dec!(0.05),
        job_total_tasks: 100,
        minimum_trust_server: dec!(0.1),
        minimum_trust_client: dec!(0.1),
        recording_oracle_addr: Address::parse("0xd979105297fb0eee83f7433fc09279cb5b94ffc6")
            .unwrap(),
        reputation_oracle_addr: Address::parse("0x61f9f0b31eacb420553da8bcc59dc617279731ac")
            .unwrap(),
        instant_result_delivery_webhook: "http://example.com/webback".to_string(),
        taskdata_uri: "http://example.com/taskdata.json".to_string(),
    }
}
