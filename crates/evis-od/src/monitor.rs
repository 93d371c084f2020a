// crates/evis-od/src/monitor.rs

//! Change tracking over a stream of telemetry updates.
//!
//! A charge point republishes its process data cyclically, mostly unchanged.
//! [`TelemetryMonitor`] remembers the last reported raw value per field and
//! turns an update into an [`Observation`] only when it is worth reporting.

use crate::custom::CustomValue;
use crate::engine::DecodeEngine;
use crate::error::DecodeFailure;
use crate::log::{DecodeContext, my_error, my_info, my_warn};
use crate::types::{ProfileId, SubindexRef};
use crate::value::{DecodedValue, RawValue};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use rust_decimal::Decimal;

/// Per-unit reporting thresholds, in physical units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    thresholds: BTreeMap<String, Decimal>,
}

impl MonitorConfig {
    /// A configuration that reports every change.
    pub fn empty() -> Self {
        MonitorConfig {
            thresholds: BTreeMap::new(),
        }
    }

    pub fn threshold(&self, unit: &str) -> Option<Decimal> {
        self.thresholds.get(unit).copied()
    }

    pub fn with_threshold(mut self, unit: impl Into<String>, threshold: Decimal) -> Self {
        self.thresholds.insert(unit.into(), threshold);
        self
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig::empty()
            .with_threshold("A", Decimal::new(2, 1))
            .with_threshold("V", Decimal::ONE)
            .with_threshold("degC", Decimal::from(5))
            .with_threshold("W", Decimal::ONE)
            .with_threshold("Hz", Decimal::ONE)
    }
}

/// A reported change of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub index: String,
    pub subindex: String,
    pub value: Result<DecodedValue, DecodeFailure>,
    /// Raw value last reported for this field, if any.
    pub previous: Option<RawValue>,
}

/// Tracks the last reported value of each field of one profile.
#[derive(Debug, Clone)]
pub struct TelemetryMonitor {
    profile: ProfileId,
    config: MonitorConfig,
    /// Index name -> subindex name -> raw value last reported.
    last_reported: BTreeMap<String, BTreeMap<String, RawValue>>,
}

impl TelemetryMonitor {
    pub fn new(profile: ProfileId, config: MonitorConfig) -> Self {
        TelemetryMonitor {
            profile,
            config,
            last_reported: BTreeMap::new(),
        }
    }

    pub fn profile(&self) -> &ProfileId {
        &self.profile
    }

    /// Raw value last reported for a field.
    pub fn last(&self, index: &str, subindex: &str) -> Option<&RawValue> {
        self.last_reported.get(index)?.get(subindex)
    }

    /// Forgets every reported value, so the next update of each field is reported.
    pub fn reset(&mut self) {
        self.last_reported.clear();
    }

    /// Feeds one update through the monitor.
    ///
    /// Returns `None` when the raw value is unchanged, or when a scaled field
    /// moved by less than its unit's threshold since the last report. In the
    /// latter case the last reported value is kept, so slow drifts are still
    /// reported once they add up.
    pub fn observe(
        &mut self,
        engine: &DecodeEngine,
        index: &str,
        subindex: &str,
        raw: impl Into<RawValue>,
    ) -> Option<Observation> {
        let raw = raw.into();
        let previous = self.last(index, subindex);
        if previous.is_some_and(|previous| same_value(previous, &raw)) {
            return None;
        }

        let value = engine.decode(&self.profile, index, subindex, raw.clone());
        if let (Ok(DecodedValue::Quantity(quantity)), Some(previous)) = (&value, previous) {
            if let Some(threshold) = self.config.threshold(quantity.unit()) {
                if let Ok(previous) = previous.as_integer() {
                    let delta = Decimal::from(quantity.raw().abs_diff(previous));
                    let limit = threshold.checked_mul(Decimal::from(quantity.factor().get()));
                    if limit.is_some_and(|limit| delta < limit) {
                        return None;
                    }
                }
            }
        }

        let ctx = DecodeContext::field(self.profile.as_str(), index, SubindexRef::Name(subindex));
        match &value {
            Ok(DecodedValue::Custom(CustomValue::ExtendedError(e))) => {
                my_error!(ctx, "Extended error: {}", e);
            }
            Ok(DecodedValue::Custom(CustomValue::FaultWord(w))) => {
                my_error!(ctx, "Fault: {}", w);
            }
            Ok(DecodedValue::Unrecognized { code }) => {
                my_warn!(ctx, "Unrecognized code {}", code);
            }
            Ok(decoded) => my_info!(ctx, "{}", decoded),
            Err(e) => my_error!(ctx, "{}", e),
        }

        let previous = match self.last_reported.get_mut(index) {
            Some(fields) => fields.insert(subindex.to_string(), raw),
            None => {
                let mut fields = BTreeMap::new();
                fields.insert(subindex.to_string(), raw);
                self.last_reported.insert(index.to_string(), fields);
                None
            }
        };
        Some(Observation {
            index: index.to_string(),
            subindex: subindex.to_string(),
            value,
            previous,
        })
    }
}

/// Integer-readable raws compare by value, so `3` and `[0x03]` are the same.
fn same_value(a: &RawValue, b: &RawValue) -> bool {
    match (a.as_integer(), b.as_integer()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom::{CustomDecoderRegistry, EXTENDED_ERROR_FUNCTION};
    use crate::lookup::{LookupTable, LookupTableStore};
    use crate::schema::{DescriptorSource, ProfileSource, SchemaRegistry};
    use alloc::sync::Arc;
    use alloc::vec;

    fn engine() -> DecodeEngine {
        let mut tables = LookupTableStore::new();
        tables.register(
            "CS_ChPt_StatusCode_e",
            [(3, "Charging")].into_iter().collect::<LookupTable>(),
        );
        let mut schema = SchemaRegistry::new(
            Arc::new(tables),
            Arc::new(CustomDecoderRegistry::with_builtins()),
        );
        schema
            .load(
                "v2g",
                ProfileSource::new()
                    .index(
                        "PM_InChargeData",
                        vec![
                            DescriptorSource::scaled("Current", "A", 100),
                            DescriptorSource::scaled("Temperature1", "degC", 1),
                            DescriptorSource::scaled("Energy", "Wh", 1),
                            DescriptorSource::scaled("OutputPower", "W", 100),
                        ],
                    )
                    .index(
                        "CS_ChargePoint",
                        vec![
                            DescriptorSource::lookup("CP_StatusCode", "CS_ChPt_StatusCode_e"),
                            DescriptorSource::custom(
                                "CP_ExtendedErrorCode",
                                EXTENDED_ERROR_FUNCTION,
                            ),
                        ],
                    ),
            )
            .unwrap();
        DecodeEngine::new(schema)
    }

    fn monitor() -> TelemetryMonitor {
        TelemetryMonitor::new(ProfileId::from("v2g"), MonitorConfig::default())
    }

    #[test]
    fn test_default_thresholds() {
        let config = MonitorConfig::default();
        assert_eq!(config.threshold("A"), Some(Decimal::new(2, 1)));
        assert_eq!(config.threshold("degC"), Some(Decimal::from(5)));
        assert_eq!(config.threshold("V"), Some(Decimal::ONE));
        assert_eq!(config.threshold("W"), Some(Decimal::ONE));
        assert_eq!(config.threshold("Hz"), Some(Decimal::ONE));
        assert_eq!(config.threshold("Wh"), None);
    }

    #[test]
    fn test_power_changes_of_one_watt_are_reported() {
        let engine = engine();
        let mut monitor = monitor();
        monitor
            .observe(&engine, "PM_InChargeData", "OutputPower", 100_000)
            .unwrap();

        // 0.99 W is below the 1 W threshold.
        assert!(monitor
            .observe(&engine, "PM_InChargeData", "OutputPower", 100_099)
            .is_none());

        let observation = monitor
            .observe(&engine, "PM_InChargeData", "OutputPower", 100_100)
            .expect("1 W change should be reported");
        assert_eq!(observation.value.unwrap().to_string(), "1001.00 W");

        let observation = monitor
            .observe(&engine, "PM_InChargeData", "OutputPower", 105_100)
            .expect("50 W change should be reported");
        assert_eq!(observation.previous, Some(RawValue::Integer(100_100)));
    }

    #[test]
    fn test_same_value_in_another_shape_is_unchanged() {
        let engine = engine();
        let mut monitor = monitor();
        monitor
            .observe(&engine, "CS_ChargePoint", "CP_StatusCode", 3)
            .unwrap();
        assert!(monitor
            .observe(&engine, "CS_ChargePoint", "CP_StatusCode", [3u8])
            .is_none());
        assert!(monitor
            .observe(&engine, "CS_ChargePoint", "CP_StatusCode", [3u8, 0])
            .is_none());
        assert_eq!(
            monitor.last("CS_ChargePoint", "CP_StatusCode"),
            Some(&RawValue::Integer(3))
        );
        assert_eq!(monitor.last("CS_ChargePoint", "CP_ExtendedErrorCode"), None);
        assert_eq!(monitor.last("Unknown_Index", "X"), None);
    }

    #[test]
    fn test_unchanged_values_are_skipped() {
        let engine = engine();
        let mut monitor = monitor();
        let first = monitor
            .observe(&engine, "CS_ChargePoint", "CP_StatusCode", 3)
            .unwrap();
        assert_eq!(first.previous, None);
        assert_eq!(first.value.unwrap().as_label(), Some("Charging"));
        assert!(monitor
            .observe(&engine, "CS_ChargePoint", "CP_StatusCode", 3)
            .is_none());

        let changed = monitor
            .observe(&engine, "CS_ChargePoint", "CP_StatusCode", 999)
            .unwrap();
        assert_eq!(changed.previous, Some(RawValue::Integer(3)));
        assert!(changed.value.unwrap().is_unrecognized());
    }

    #[test]
    fn test_scaled_changes_below_threshold_accumulate() {
        let engine = engine();
        let mut monitor = monitor();
        monitor.observe(&engine, "PM_InChargeData", "Current", 1000).unwrap();

        // 0.10 A then 0.15 A away from the last report: below 0.2 A.
        assert!(monitor.observe(&engine, "PM_InChargeData", "Current", 1010).is_none());
        assert!(monitor.observe(&engine, "PM_InChargeData", "Current", 985).is_none());
        assert_eq!(
            monitor.last("PM_InChargeData", "Current"),
            Some(&RawValue::Integer(1000))
        );

        // Exactly 0.20 A is reported.
        let observation = monitor
            .observe(&engine, "PM_InChargeData", "Current", 1020)
            .unwrap();
        assert_eq!(observation.value.unwrap().to_string(), "10.20 A");
    }

    #[test]
    fn test_negative_temperature_delta() {
        let engine = engine();
        let mut monitor = monitor();
        monitor.observe(&engine, "PM_InChargeData", "Temperature1", 2).unwrap();
        assert!(monitor
            .observe(&engine, "PM_InChargeData", "Temperature1", -2)
            .is_none());
        assert!(monitor
            .observe(&engine, "PM_InChargeData", "Temperature1", -3)
            .is_some());
    }

    #[test]
    fn test_units_without_threshold_report_every_change() {
        let engine = engine();
        let mut monitor = monitor();
        monitor.observe(&engine, "PM_InChargeData", "Energy", 10).unwrap();
        assert!(monitor.observe(&engine, "PM_InChargeData", "Energy", 11).is_some());
    }

    #[test]
    fn test_failures_are_reported() {
        let engine = engine();
        let mut monitor = monitor();
        let observation = monitor
            .observe(&engine, "CS_ChargePoint", "CP_ExtendedErrorCode", [0u8; 3])
            .unwrap();
        assert!(matches!(
            observation.value,
            Err(DecodeFailure::MalformedInput { .. })
        ));

        monitor.reset();
        let missing = monitor
            .observe(&engine, "Unknown_Index", "X", 0)
            .unwrap();
        assert!(matches!(missing.value, Err(DecodeFailure::NotFound(_))));
    }
}
