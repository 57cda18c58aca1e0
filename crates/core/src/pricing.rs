//! Per-unit resource rates and monthly cost conversions
//!
//! Rates are fixed for the duration of one invocation; selection happens
//! up front through [`PricingConfig`] and is passed into the calculator and
//! optimizer explicitly. Conversions are pure arithmetic with no input
//! sanitization: negative or NaN quantities produce negative or NaN costs.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Average hours in a month. Fixed by design, not configurable; every
/// monthly figure in the system derives from this constant.
pub const HOURS_PER_MONTH: f64 = 730.0;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Per-unit rates for the four billed resource kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pricing {
    /// Cost per CPU core per hour.
    pub cpu_hourly: f64,
    /// Cost per GB of memory per hour.
    pub memory_gb_hourly: f64,
    /// Cost per GPU per hour.
    pub gpu_hourly: f64,
    /// Cost per GB of storage per month.
    pub storage_gb_monthly: f64,
}

impl Default for Pricing {
    /// AWS-like rates, based on typical m5.large pricing with T4 GPUs.
    fn default() -> Self {
        Self {
            cpu_hourly: 0.024,
            memory_gb_hourly: 0.003,
            gpu_hourly: 0.90,
            storage_gb_monthly: 0.10,
        }
    }
}

impl Pricing {
    /// Google Cloud rates (n2-standard, T4 GPU).
    pub fn gcp() -> Self {
        Self {
            cpu_hourly: 0.022,
            memory_gb_hourly: 0.003,
            gpu_hourly: 0.85,
            storage_gb_monthly: 0.10,
        }
    }

    /// Azure rates (NC-series GPUs).
    pub fn azure() -> Self {
        Self {
            cpu_hourly: 0.025,
            memory_gb_hourly: 0.003,
            gpu_hourly: 0.95,
            storage_gb_monthly: 0.12,
        }
    }

    /// Monthly cost of a CPU core count.
    pub fn cpu_cost(&self, cores: f64) -> f64 {
        cores * self.cpu_hourly * HOURS_PER_MONTH
    }

    /// Monthly cost of a memory quantity in bytes.
    pub fn memory_cost(&self, bytes: u64) -> f64 {
        (bytes as f64 / BYTES_PER_GB) * self.memory_gb_hourly * HOURS_PER_MONTH
    }

    /// Monthly cost of a GPU unit count.
    pub fn gpu_cost(&self, count: u64) -> f64 {
        count as f64 * self.gpu_hourly * HOURS_PER_MONTH
    }

    /// Monthly cost of a storage quantity in bytes.
    pub fn storage_cost(&self, bytes: u64) -> f64 {
        (bytes as f64 / BYTES_PER_GB) * self.storage_gb_monthly
    }
}

/// Rate overrides loaded from the user's config file. A named provider
/// preset is applied first, then any explicit per-rate override on top.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Provider preset: "aws" (default rates), "gcp", or "azure".
    pub provider: Option<String>,
    pub cpu_hourly: Option<f64>,
    pub memory_gb_hourly: Option<f64>,
    pub gpu_hourly: Option<f64>,
    pub storage_gb_monthly: Option<f64>,
}

impl PricingConfig {
    /// Resolve the configured rate set. Unknown providers fall back to the
    /// default preset.
    pub fn resolve(&self) -> Pricing {
        let mut pricing = match self.provider.as_deref() {
            None => Pricing::default(),
            Some(name) => match name.to_lowercase().as_str() {
                "aws" | "default" => Pricing::default(),
                "gcp" => Pricing::gcp(),
                "azure" => Pricing::azure(),
                other => {
                    warn!(provider = %other, "Unknown pricing provider, using default rates");
                    Pricing::default()
                }
            },
        };

        if let Some(rate) = self.cpu_hourly {
            pricing.cpu_hourly = rate;
        }
        if let Some(rate) = self.memory_gb_hourly {
            pricing.memory_gb_hourly = rate;
        }
        if let Some(rate) = self.gpu_hourly {
            pricing.gpu_hourly = rate;
        }
        if let Some(rate) = self.storage_gb_monthly {
            pricing.storage_gb_monthly = rate;
        }

        pricing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_zero_quantities_cost_nothing() {
        let pricing = Pricing::default();
        assert_eq!(pricing.cpu_cost(0.0), 0.0);
        assert_eq!(pricing.memory_cost(0), 0.0);
        assert_eq!(pricing.gpu_cost(0), 0.0);
        assert_eq!(pricing.storage_cost(0), 0.0);
    }

    #[test]
    fn test_monthly_rates() {
        let pricing = Pricing::default();
        assert!((pricing.cpu_cost(1.0) - 0.024 * 730.0).abs() < 1e-9);
        assert!((pricing.memory_cost(GIB) - 0.003 * 730.0).abs() < 1e-9);
        assert!((pricing.gpu_cost(1) - 0.90 * 730.0).abs() < 1e-9);
        assert!((pricing.storage_cost(10 * GIB) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_is_linear() {
        let pricing = Pricing::gcp();
        assert!((pricing.cpu_cost(6.0) - 3.0 * pricing.cpu_cost(2.0)).abs() < 1e-9);
        assert!((pricing.memory_cost(4 * GIB) - 4.0 * pricing.memory_cost(GIB)).abs() < 1e-9);
        assert!((pricing.gpu_cost(8) - 8.0 * pricing.gpu_cost(1)).abs() < 1e-9);
    }

    #[test]
    fn test_provider_presets() {
        let config = PricingConfig {
            provider: Some("gcp".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve(), Pricing::gcp());

        let config = PricingConfig {
            provider: Some("Azure".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve(), Pricing::azure());

        let config = PricingConfig {
            provider: Some("on-prem".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve(), Pricing::default());
    }

    #[test]
    fn test_overrides_apply_on_top_of_preset() {
        let config = PricingConfig {
            provider: Some("gcp".to_string()),
            gpu_hourly: Some(0.40),
            ..Default::default()
        };
        let pricing = config.resolve();
        assert_eq!(pricing.cpu_hourly, Pricing::gcp().cpu_hourly);
        assert_eq!(pricing.gpu_hourly, 0.40);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(PricingConfig::default().resolve(), Pricing::default());
    }
}
