//! DIM_COMPLIANCE_FRAMEWORKS: the 8 compliance frameworks customers adopt.
//!
//! Static reference data. Ids are stable (1–8) and ordered so that
//! SOC2_Type_I comes before SOC2_Type_II; the adoption simulator relies on
//! that ordering for the Type I → Type II prerequisite.

use crate::types::FrameworkId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FrameworkKind {
    #[serde(rename = "SOC2_Type_I")]
    Soc2TypeI,
    #[serde(rename = "SOC2_Type_II")]
    Soc2TypeII,
    #[serde(rename = "ISO27001")]
    Iso27001,
    #[serde(rename = "HIPAA")]
    Hipaa,
    #[serde(rename = "GDPR")]
    Gdpr,
    #[serde(rename = "PCI_DSS")]
    PciDss,
    #[serde(rename = "FedRAMP")]
    FedRamp,
    #[serde(rename = "NIST_CSF")]
    NistCsf,
}

impl FrameworkKind {
    pub const ALL: [FrameworkKind; 8] = [
        Self::Soc2TypeI,
        Self::Soc2TypeII,
        Self::Iso27001,
        Self::Hipaa,
        Self::Gdpr,
        Self::PciDss,
        Self::FedRamp,
        Self::NistCsf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soc2TypeI  => "SOC2_Type_I",
            Self::Soc2TypeII => "SOC2_Type_II",
            Self::Iso27001   => "ISO27001",
            Self::Hipaa      => "HIPAA",
            Self::Gdpr       => "GDPR",
            Self::PciDss     => "PCI_DSS",
            Self::FedRamp    => "FedRAMP",
            Self::NistCsf    => "NIST_CSF",
        }
    }
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Framework {
    pub framework_id: FrameworkId,
    pub framework_name: FrameworkKind,
    pub framework_category: String,
    /// 1–10.
    pub complexity_score: u32,
    pub avg_completion_days: u32,
    pub industry_relevance: String,
    pub geographic_scope: String,
    pub automation_percentage: u32,
    pub annual_audit_required: bool,
    pub certification_cost_usd: u64,
}

#[allow(clippy::too_many_arguments)]
fn framework(
    framework_id: FrameworkId,
    framework_name: FrameworkKind,
    category: &str,
    complexity_score: u32,
    avg_completion_days: u32,
    industry_relevance: &str,
    geographic_scope: &str,
    automation_percentage: u32,
    annual_audit_required: bool,
    certification_cost_usd: u64,
) -> Framework {
    Framework {
        framework_id,
        framework_name,
        framework_category: category.into(),
        complexity_score,
        avg_completion_days,
        industry_relevance: industry_relevance.into(),
        geographic_scope: geographic_scope.into(),
        automation_percentage,
        annual_audit_required,
        certification_cost_usd,
    }
}

/// The full catalog in id order.
#[rustfmt::skip]
pub fn catalog() -> Vec<Framework> {
    use FrameworkKind::*;
    vec![
        framework(1, Soc2TypeI,  "security_audit",          4,  90, "all_industries",         "global",     75, false,  25_000),
        framework(2, Soc2TypeII, "security_audit",          7, 180, "all_industries",         "global",     65, true,   45_000),
        framework(3, Iso27001,   "security_management",     8, 240, "all_industries",         "global",     60, true,   35_000),
        framework(4, Hipaa,      "healthcare_privacy",      6, 150, "healthtech",             "usa",        70, false,  15_000),
        framework(5, Gdpr,       "data_privacy",            7, 120, "all_industries",         "eu_global",  55, false,  20_000),
        framework(6, PciDss,     "payment_security",        5,  90, "ecommerce_fintech",      "global",     80, true,   30_000),
        framework(7, FedRamp,    "government_cloud",        9, 365, "government_contractors", "usa",        45, true,  150_000),
        framework(8, NistCsf,    "cybersecurity_framework", 6, 180, "all_industries",         "usa_global", 70, false,  25_000),
    ]
}

/// Find a framework by kind in a loaded table.
pub fn find_kind(frameworks: &[Framework], kind: FrameworkKind) -> Option<&Framework> {
    frameworks.iter().find(|f| f.framework_name == kind)
}

/// Ranges and counts printed after the catalog is written.
#[derive(Debug, Clone)]
pub struct CatalogSummary {
    pub total_frameworks: usize,
    pub unique_ids: usize,
    pub unique_names: usize,
    pub categories: BTreeSet<String>,
    pub complexity_range: (u32, u32),
    pub completion_days_range: (u32, u32),
    pub automation_range: (u32, u32),
    pub cost_range: (u64, u64),
    pub annual_audit_required_count: usize,
}

pub fn summarize(frameworks: &[Framework]) -> CatalogSummary {
    fn range<T: Copy + Ord + Default>(values: impl Iterator<Item = T> + Clone) -> (T, T) {
        (
            values.clone().min().unwrap_or_default(),
            values.max().unwrap_or_default(),
        )
    }

    CatalogSummary {
        total_frameworks: frameworks.len(),
        unique_ids: frameworks.iter().map(|f| f.framework_id).collect::<BTreeSet<_>>().len(),
        unique_names: frameworks.iter().map(|f| f.framework_name).collect::<BTreeSet<_>>().len(),
        categories: frameworks.iter().map(|f| f.framework_category.clone()).collect(),
        complexity_range: range(frameworks.iter().map(|f| f.complexity_score)),
        completion_days_range: range(frameworks.iter().map(|f| f.avg_completion_days)),
        automation_range: range(frameworks.iter().map(|f| f.automation_percentage)),
        cost_range: range(frameworks.iter().map(|f| f.certification_cost_usd)),
        annual_audit_required_count: frameworks.iter().filter(|f| f.annual_audit_required).count(),
    }
}

impl fmt::Display for CatalogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== COMPLIANCE FRAMEWORKS ===")?;
        writeln!(f, "  frameworks:        {}", self.total_frameworks)?;
        writeln!(f, "  unique ids:        {}", self.unique_ids)?;
        writeln!(f, "  unique names:      {}", self.unique_names)?;
        writeln!(
            f,
            "  categories:        {}",
            self.categories.iter().cloned().collect::<Vec<_>>().join(", ")
        )?;
        let (lo, hi) = self.complexity_range;
        writeln!(f, "  complexity:        {lo}-{hi}")?;
        writeln!(
            f,
            "  completion days:   {}-{}",
            self.completion_days_range.0, self.completion_days_range.1
        )?;
        let (lo, hi) = self.automation_range;
        writeln!(f, "  automation %:      {lo}-{hi}")?;
        writeln!(f, "  certification:     ${}-${}", self.cost_range.0, self.cost_range.1)?;
        write!(f, "  annual audit:      {}", self.annual_audit_required_count)
    }
}
