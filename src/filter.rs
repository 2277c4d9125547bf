//! Explicit filter context
//!
//! Cluster dashboards usually keep the active selection (hardware, models,
//! free-text search) in shared UI state. Here it is a plain value passed into
//! every call that filters, so the same inputs always give the same output.

use serde::{Deserialize, Serialize};

use crate::normalize::{ConfigKind, NormalizedReport};
use crate::points::ParetoPoint;

/// Active selection; every empty list means "no restriction"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterContext {
    /// Accelerator models to keep
    pub hardware: Vec<String>,
    /// Models to keep
    pub models: Vec<String>,
    /// Engine tools to keep
    pub frameworks: Vec<String>,
    /// Topologies to keep
    pub configs: Vec<ConfigKind>,
    /// Sequence-length buckets to keep
    pub seq_lens: Vec<String>,
    /// Case-insensitive substring matched against any identity field
    pub search: String,
}

impl FilterContext {
    /// Filter that keeps everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to these accelerators
    #[must_use]
    pub fn with_hardware<I, S>(mut self, hardware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hardware = hardware.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to these models
    #[must_use]
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to these engine tools
    #[must_use]
    pub fn with_frameworks<I, S>(mut self, frameworks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frameworks = frameworks.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to these topologies
    #[must_use]
    pub fn with_configs(mut self, configs: Vec<ConfigKind>) -> Self {
        self.configs = configs;
        self
    }

    /// Restrict to these sequence-length buckets
    #[must_use]
    pub fn with_seq_lens<I, S>(mut self, seq_lens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seq_lens = seq_lens.into_iter().map(Into::into).collect();
        self
    }

    /// Set the free-text search
    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_string();
        self
    }

    /// True when no restriction is active
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hardware.is_empty()
            && self.models.is_empty()
            && self.frameworks.is_empty()
            && self.configs.is_empty()
            && self.seq_lens.is_empty()
            && self.search.trim().is_empty()
    }

    fn matches_fields(
        &self,
        hardware: &str,
        model: &str,
        framework: &str,
        config: ConfigKind,
        seq_len: &str,
    ) -> bool {
        let allowed = |list: &[String], value: &str| list.is_empty() || list.iter().any(|v| v == value);

        if !(allowed(&self.hardware, hardware)
            && allowed(&self.models, model)
            && allowed(&self.frameworks, framework)
            && allowed(&self.seq_lens, seq_len)
            && (self.configs.is_empty() || self.configs.contains(&config)))
        {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || [hardware, model, framework, config.as_str(), seq_len]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Does this point pass the filter?
    #[must_use]
    pub fn matches(&self, point: &ParetoPoint) -> bool {
        self.matches_fields(
            &point.hardware,
            &point.model,
            &point.framework,
            point.config,
            &point.seq_len,
        )
    }

    /// Does this normalized report pass the filter?
    #[must_use]
    pub fn matches_report(&self, report: &NormalizedReport) -> bool {
        self.matches_fields(
            &report.hardware,
            &report.model,
            &report.framework,
            report.config,
            &report.seq_len,
        )
    }

    /// Points that pass, in input order
    #[must_use]
    pub fn apply(&self, points: &[ParetoPoint]) -> Vec<ParetoPoint> {
        points.iter().filter(|p| self.matches(p)).cloned().collect()
    }

    /// Normalized reports that pass, in input order
    #[must_use]
    pub fn apply_reports(&self, reports: &[NormalizedReport]) -> Vec<NormalizedReport> {
        reports
            .iter()
            .filter(|r| self.matches_report(r))
            .cloned()
            .collect()
    }
}

/// Distinct values present in a point set, for populating selection lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Accelerators, first-seen order
    pub hardware: Vec<String>,
    /// Models, first-seen order
    pub models: Vec<String>,
    /// Engine tools, first-seen order
    pub frameworks: Vec<String>,
    /// Topologies, first-seen order
    pub configs: Vec<ConfigKind>,
    /// Sequence-length buckets, first-seen order
    pub seq_lens: Vec<String>,
}

impl FilterOptions {
    /// Collect the distinct values of each identity field
    #[must_use]
    pub fn from_points(points: &[ParetoPoint]) -> Self {
        fn push_unique<T: PartialEq + Clone>(list: &mut Vec<T>, value: &T) {
            if !list.contains(value) {
                list.push(value.clone());
            }
        }

        let mut options = Self::default();
        for p in points {
            push_unique(&mut options.hardware, &p.hardware);
            push_unique(&mut options.models, &p.model);
            push_unique(&mut options.frameworks, &p.framework);
            push_unique(&mut options.configs, &p.config);
            push_unique(&mut options.seq_lens, &p.seq_len);
        }
        options
    }
}
