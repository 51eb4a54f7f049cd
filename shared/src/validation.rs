//! Validation utilities for the Spray Operations Platform

use rust_decimal::Decimal;

use crate::geometry::PlotGeometry;

/// Validate an aircraft application swath width in meters
pub fn validate_swath_width(width_meters: f64) -> Result<(), &'static str> {
    if !width_meters.is_finite() {
        return Err("Swath width must be a finite number");
    }
    if width_meters <= 0.0 {
        return Err("Swath width must be positive");
    }
    Ok(())
}

/// Validate a recommended dosage in liters per hectare
pub fn validate_dosage(dosage_liters_per_ha: f64) -> Result<(), &'static str> {
    if !dosage_liters_per_ha.is_finite() {
        return Err("Dosage must be a finite number");
    }
    if dosage_liters_per_ha <= 0.0 {
        return Err("Dosage must be positive");
    }
    Ok(())
}

/// Validate a product cost per liter
pub fn validate_cost_per_liter(cost: Decimal) -> Result<(), &'static str> {
    if cost < Decimal::ZERO {
        return Err("Cost per liter cannot be negative");
    }
    Ok(())
}

/// Validate that a plot geometry is a usable polygon ring
pub fn validate_plot_geometry(geometry: &PlotGeometry) -> Result<(), &'static str> {
    if geometry.exterior_vertex_count() < 3 {
        return Err("Plot geometry must have at least 3 vertices");
    }
    if geometry
        .0
        .exterior()
        .0
        .iter()
        .any(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        return Err("Plot geometry contains non-finite coordinates");
    }
    Ok(())
}
