use crate::error::{Result, XunitArgsError};
use indexmap::{IndexMap, IndexSet};

/// Report formats the xUnit console runner can be asked to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    NunitXml,
    Html,
    Xml,
    /// The v1 XML format. Requesting it always fails during synthesis;
    /// it exists so the request can be represented and rejected.
    XmlV1,
}

/// Granularity at which test execution may be parallelized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    None,
    Collections,
    Assemblies,
    All,
}

impl Parallelism {
    /// The value the console runner expects after `-parallel`.
    pub fn as_flag_value(&self) -> &'static str {
        match self {
            Parallelism::None => "none",
            Parallelism::Collections => "collections",
            Parallelism::Assemblies => "assemblies",
            Parallelism::All => "all",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Parallelism::None),
            "collections" => Ok(Parallelism::Collections),
            "assemblies" => Ok(Parallelism::Assemblies),
            "all" => Ok(Parallelism::All),
            other => Err(XunitArgsError::InvalidParallelism(other.to_string())),
        }
    }
}

/// Settings for one test run request.
///
/// Trait maps keep insertion order in both dimensions, so the flags a user
/// listed first are emitted first.
#[derive(Debug, Clone)]
pub struct TestSettings {
    pub shadow_copy: bool,
    pub app_domain: bool,
    pub reports: IndexSet<ReportFormat>,
    pub parallelism: Parallelism,
    pub max_threads: Option<u32>,
    pub include_traits: IndexMap<String, IndexSet<String>>,
    pub exclude_traits: IndexMap<String, IndexSet<String>>,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            shadow_copy: true,
            app_domain: true,
            reports: IndexSet::new(),
            parallelism: Parallelism::None,
            max_threads: None,
            include_traits: IndexMap::new(),
            exclude_traits: IndexMap::new(),
        }
    }
}

impl TestSettings {
    pub fn report(&mut self, format: ReportFormat) -> &mut Self {
        self.reports.insert(format);
        self
    }

    pub fn include_trait(&mut self, name: &str, value: &str) -> &mut Self {
        self.include_traits
            .entry(name.to_string())
            .or_default()
            .insert(value.to_string());
        self
    }

    pub fn exclude_trait(&mut self, name: &str, value: &str) -> &mut Self {
        self.exclude_traits
            .entry(name.to_string())
            .or_default()
            .insert(value.to_string());
        self
    }
}
