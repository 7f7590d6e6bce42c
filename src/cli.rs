use crate::config::{Parallelism, ReportFormat, TestSettings};
use crate::context::ExecutionContext;
use crate::error::{Result, XunitArgsError};
use clap::Parser;
use regex::Regex;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xunitargs")]
#[command(about = "Translates .NET test settings into xUnit console runner arguments")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Test project file
    pub project: PathBuf,

    /// Directory the report files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Base directory for resolving relative paths (defaults to the current directory)
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// Generate an NUnit-style XML report
    #[arg(long)]
    pub nunit: bool,

    /// Generate an HTML report
    #[arg(long)]
    pub html: bool,

    /// Generate an XML report
    #[arg(long)]
    pub xml: bool,

    /// Generate a v1-format XML report (not supported on .NET Core)
    #[arg(long)]
    pub xml_v1: bool,

    /// Run test assemblies without shadow copying (not supported on .NET Core)
    #[arg(long)]
    pub no_shadow_copy: bool,

    /// Run tests without an app domain (not supported on .NET Core)
    #[arg(long)]
    pub no_app_domain: bool,

    /// Parallelize test execution (none, collections, assemblies, all)
    #[arg(short, long)]
    pub parallel: Option<String>,

    /// Maximum threads for collection parallelization (0 = unlimited)
    #[arg(short, long)]
    pub max_threads: Option<u32>,

    /// Only run tests with the given trait (NAME=VALUE, repeatable)
    #[arg(long = "trait", value_name = "NAME=VALUE")]
    pub traits: Vec<String>,

    /// Skip tests with the given trait (NAME=VALUE, repeatable)
    #[arg(long = "notrait", value_name = "NAME=VALUE")]
    pub notraits: Vec<String>,
}

impl Cli {
    pub fn to_settings(&self) -> Result<TestSettings> {
        let mut settings = TestSettings {
            shadow_copy: !self.no_shadow_copy,
            app_domain: !self.no_app_domain,
            ..TestSettings::default()
        };

        if self.nunit {
            settings.report(ReportFormat::NunitXml);
        }
        if self.html {
            settings.report(ReportFormat::Html);
        }
        if self.xml {
            settings.report(ReportFormat::Xml);
        }
        if self.xml_v1 {
            settings.report(ReportFormat::XmlV1);
        }

        if let Some(ref parallel) = self.parallel {
            settings.parallelism = Parallelism::parse(parallel)?;
        }
        settings.max_threads = self.max_threads;

        for spec in &self.traits {
            let (name, value) = parse_trait_spec(spec)?;
            settings.include_trait(&name, &value);
        }
        for spec in &self.notraits {
            let (name, value) = parse_trait_spec(spec)?;
            settings.exclude_trait(&name, &value);
        }

        Ok(settings)
    }

    pub fn to_context(&self, working_dir: &Path) -> ExecutionContext {
        let working_dir = self.working_dir.as_deref().unwrap_or(working_dir);
        ExecutionContext::new(&self.project, &self.output_dir, working_dir)
    }
}

/// Splits a `NAME=VALUE` trait spec. Both sides must be nonempty; the name
/// must not contain `=`.
pub fn parse_trait_spec(spec: &str) -> Result<(String, String)> {
    let re = Regex::new(r"^([^=]+)=(.+)$").unwrap();
    let captures = re
        .captures(spec)
        .ok_or_else(|| XunitArgsError::InvalidTrait(spec.to_string()))?;
    Ok((captures[1].to_string(), captures[2].to_string()))
}
