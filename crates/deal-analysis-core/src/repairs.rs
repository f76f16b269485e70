//! Repair cost estimation.
//!
//! Either a single manually entered total (flat mode) or an itemized
//! quantity x unit-rate rollup following contractor-estimate conventions:
//! four material categories, labor as a share of materials, and a
//! contingency buffer on top.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DealError;
use crate::types::{add, mul, sum, with_metadata, ComputationOutput, Money, Rate};
use crate::DealResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Unit counts and areas for an itemized estimate. Missing fields are zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairQuantities {
    /// Living area of the subject; the roof is priced off this footprint
    pub house_sqft: Decimal,
    /// Share of the roof needing work, 0-100
    pub roof_percent: Decimal,
    pub foundation_linear_ft: Decimal,
    pub siding_sqft: Decimal,
    pub flooring_sqft: Decimal,
    pub paint_rooms: Decimal,
    pub doors: Decimal,
    pub deck_sqft: Decimal,
    pub landscaping_sqft: Decimal,
    pub hvac_units: Decimal,
    pub water_heaters: Decimal,
    pub electrical_panels: Decimal,
    pub windows: Decimal,
    pub appliances: Decimal,
    pub light_fixtures: Decimal,
    pub plumbing_fixtures: Decimal,
    pub garage_doors: Decimal,
}

/// Published unit-rate table. Override by deserializing a partial table;
/// any rate left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairRates {
    pub roof_per_sqft: Money,
    pub foundation_per_linear_ft: Money,
    pub siding_per_sqft: Money,
    pub flooring_per_sqft: Money,
    pub paint_per_room: Money,
    pub door_each: Money,
    pub deck_per_sqft: Money,
    pub landscaping_per_sqft: Money,
    pub hvac_per_unit: Money,
    pub water_heater_each: Money,
    pub electrical_panel_each: Money,
    pub window_each: Money,
    pub appliance_each: Money,
    pub light_fixture_each: Money,
    pub plumbing_fixture_each: Money,
    pub garage_door_each: Money,
    /// Labor and permits as a fraction of material cost
    pub labor_rate: Rate,
    /// Contingency as a fraction of the subtotal
    pub contingency_rate: Rate,
}

impl Default for RepairRates {
    fn default() -> Self {
        Self {
            roof_per_sqft: dec!(8),
            foundation_per_linear_ft: dec!(150),
            siding_per_sqft: dec!(12),
            flooring_per_sqft: dec!(8),
            paint_per_room: dec!(800),
            door_each: dec!(350),
            deck_per_sqft: dec!(15),
            landscaping_per_sqft: dec!(3),
            hvac_per_unit: dec!(6000),
            water_heater_each: dec!(1200),
            electrical_panel_each: dec!(2500),
            window_each: dec!(450),
            appliance_each: dec!(800),
            light_fixture_each: dec!(150),
            plumbing_fixture_each: dec!(300),
            garage_door_each: dec!(800),
            labor_rate: dec!(0.30),
            contingency_rate: dec!(0.15),
        }
    }
}

impl RepairRates {
    /// Reject negative rates; a zero rate is allowed (item not priced).
    pub fn validate(&self) -> DealResult<()> {
        let rates = [
            ("roof_per_sqft", self.roof_per_sqft),
            ("foundation_per_linear_ft", self.foundation_per_linear_ft),
            ("siding_per_sqft", self.siding_per_sqft),
            ("flooring_per_sqft", self.flooring_per_sqft),
            ("paint_per_room", self.paint_per_room),
            ("door_each", self.door_each),
            ("deck_per_sqft", self.deck_per_sqft),
            ("landscaping_per_sqft", self.landscaping_per_sqft),
            ("hvac_per_unit", self.hvac_per_unit),
            ("water_heater_each", self.water_heater_each),
            ("electrical_panel_each", self.electrical_panel_each),
            ("window_each", self.window_each),
            ("appliance_each", self.appliance_each),
            ("light_fixture_each", self.light_fixture_each),
            ("plumbing_fixture_each", self.plumbing_fixture_each),
            ("garage_door_each", self.garage_door_each),
            ("labor_rate", self.labor_rate),
            ("contingency_rate", self.contingency_rate),
        ];
        for (field, value) in rates {
            if value < Decimal::ZERO {
                return Err(DealError::InvalidInput {
                    field: field.into(),
                    reason: format!("Rate must not be negative (got {value})"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairBreakdown {
    /// Roof, foundation and siding
    pub structural: Money,
    /// Flooring, paint, doors, deck and landscaping
    pub interior: Money,
    /// HVAC, water heaters, electrical panels and windows
    pub systems: Money,
    /// Appliances, light and plumbing fixtures, garage doors
    pub appliances_fixtures: Money,
    /// Material base that labor is charged on
    pub materials: Money,
    pub labor: Money,
    pub subtotal: Money,
    pub contingency: Money,
    pub total: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairMode {
    Flat,
    Itemized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairEstimate {
    pub mode: RepairMode,
    /// Repair figure fed to the offer engine
    pub total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<RepairBreakdown>,
}

/// Standalone repair estimate: the itemized sheet when given, else the
/// flat total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairInput {
    pub repairs: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<RepairQuantities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rates: Option<RepairRates>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Flat mode: the manual entry, with negatives treated as zero.
pub fn total_repairs(input: Money) -> Money {
    input.max(Decimal::ZERO)
}

/// Itemized mode rollup.
///
/// Landscaping is reported under interior but sits outside the labor base:
/// labor is charged on the four material categories before landscaping is
/// added, then contingency applies to everything including labor.
pub fn estimate_repairs(q: &RepairQuantities, rates: &RepairRates) -> DealResult<RepairBreakdown> {
    rates.validate()?;
    check_quantities(q)?;

    let roof_share = q.roof_percent / dec!(100);
    let structural = sum([
        line("house_sqft", mul(roof_share, q.house_sqft, "house_sqft")?, rates.roof_per_sqft)?,
        line("foundation_linear_ft", q.foundation_linear_ft, rates.foundation_per_linear_ft)?,
        line("siding_sqft", q.siding_sqft, rates.siding_per_sqft)?,
    ])?;

    let interior_materials = sum([
        line("flooring_sqft", q.flooring_sqft, rates.flooring_per_sqft)?,
        line("paint_rooms", q.paint_rooms, rates.paint_per_room)?,
        line("doors", q.doors, rates.door_each)?,
        line("deck_sqft", q.deck_sqft, rates.deck_per_sqft)?,
    ])?;

    let systems = sum([
        line("hvac_units", q.hvac_units, rates.hvac_per_unit)?,
        line("water_heaters", q.water_heaters, rates.water_heater_each)?,
        line("electrical_panels", q.electrical_panels, rates.electrical_panel_each)?,
        line("windows", q.windows, rates.window_each)?,
    ])?;

    let appliances_fixtures = sum([
        line("appliances", q.appliances, rates.appliance_each)?,
        line("light_fixtures", q.light_fixtures, rates.light_fixture_each)?,
        line("plumbing_fixtures", q.plumbing_fixtures, rates.plumbing_fixture_each)?,
        line("garage_doors", q.garage_doors, rates.garage_door_each)?,
    ])?;

    let materials = sum([
        ("structural", structural),
        ("interior", interior_materials),
        ("systems", systems),
        ("appliances_fixtures", appliances_fixtures),
    ])?;
    let labor = mul(materials, rates.labor_rate, "labor_rate")?;

    let (_, landscaping) =
        line("landscaping_sqft", q.landscaping_sqft, rates.landscaping_per_sqft)?;
    let interior = add(interior_materials, landscaping, "landscaping_sqft")?;
    let subtotal = sum([
        ("structural", structural),
        ("interior", interior),
        ("systems", systems),
        ("appliances_fixtures", appliances_fixtures),
        ("labor_rate", labor),
    ])?;
    let contingency = mul(subtotal, rates.contingency_rate, "contingency_rate")?;
    let total = add(subtotal, contingency, "contingency_rate")?;

    Ok(RepairBreakdown {
        structural,
        interior,
        systems,
        appliances_fixtures,
        materials,
        labor,
        subtotal,
        contingency,
        total,
    })
}

pub fn analyze_repairs(input: &RepairInput) -> DealResult<ComputationOutput<RepairEstimate>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let estimate = match &input.items {
        Some(items) => {
            let default_rates = RepairRates::default();
            let rates = input.rates.as_ref().unwrap_or(&default_rates);
            let breakdown = estimate_repairs(items, rates)?;
            if input.repairs > Decimal::ZERO {
                warnings.push("Itemized repair sheet supplied; flat repairs figure ignored".into());
            }
            if breakdown.total.is_zero() {
                warnings.push("Itemized sheet has no quantities; estimate is $0".into());
            }
            RepairEstimate {
                mode: RepairMode::Itemized,
                total: breakdown
                    .total
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
                breakdown: Some(breakdown),
            }
        }
        None => {
            if input.repairs < Decimal::ZERO {
                warnings.push(format!("Repairs {} is negative; treated as 0", input.repairs));
            }
            RepairEstimate {
                mode: RepairMode::Flat,
                total: total_repairs(input.repairs),
                breakdown: None,
            }
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Repair Cost Estimate (materials + 30% labor + 15% contingency)",
        input,
        warnings,
        elapsed,
        estimate,
    ))
}

/// Quantity x unit rate for one line of the sheet, tagged with its field.
fn line(field: &str, quantity: Decimal, rate: Money) -> DealResult<(&str, Money)> {
    Ok((field, mul(quantity, rate, field)?))
}

fn check_quantities(q: &RepairQuantities) -> DealResult<()> {
    if q.roof_percent > dec!(100) {
        return Err(DealError::InvalidInput {
            field: "roof_percent".into(),
            reason: "Roof share cannot exceed 100%".into(),
        });
    }
    let fields = [
        ("house_sqft", q.house_sqft),
        ("roof_percent", q.roof_percent),
        ("foundation_linear_ft", q.foundation_linear_ft),
        ("siding_sqft", q.siding_sqft),
        ("flooring_sqft", q.flooring_sqft),
        ("paint_rooms", q.paint_rooms),
        ("doors", q.doors),
        ("deck_sqft", q.deck_sqft),
        ("landscaping_sqft", q.landscaping_sqft),
        ("hvac_units", q.hvac_units),
        ("water_heaters", q.water_heaters),
        ("electrical_panels", q.electrical_panels),
        ("windows", q.windows),
        ("appliances", q.appliances),
        ("light_fixtures", q.light_fixtures),
        ("plumbing_fixtures", q.plumbing_fixtures),
        ("garage_doors", q.garage_doors),
    ];
    for (field, value) in fields {
        if value < Decimal::ZERO {
            return Err(DealError::InvalidInput {
                field: field.into(),
                reason: format!("Quantity must not be negative (got {value})"),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
