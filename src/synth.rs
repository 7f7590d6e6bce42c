use crate::args::ArgumentList;
use crate::config::{Parallelism, ReportFormat, TestSettings};
use crate::context::ExecutionContext;
use crate::error::{Result, XunitArgsError};

/// Translates test settings into console-runner argument tokens.
///
/// Validation runs first and fails before any token is emitted, so a
/// returned list is always complete. Token order is fixed: report flags
/// (nunit, html, xml), then parallelism, then maxthreads, then trait
/// filters in insertion order.
pub fn synthesize(settings: &TestSettings, ctx: &ExecutionContext) -> Result<ArgumentList> {
    validate(settings)?;

    let mut args = ArgumentList::new();

    if settings.reports.contains(&ReportFormat::NunitXml) {
        args.append("-nunit");
        args.append_quoted(report_path(ctx, "xml")?);
    }

    if settings.reports.contains(&ReportFormat::Html) {
        args.append("-html");
        args.append_quoted(report_path(ctx, "html")?);
    }

    if settings.reports.contains(&ReportFormat::Xml) {
        args.append("-xml");
        args.append_quoted(report_path(ctx, "xml")?);
    }

    if settings.parallelism != Parallelism::None {
        args.append(format!("-parallel {}", settings.parallelism.as_flag_value()));
    }

    if let Some(threads) = settings.max_threads {
        if threads == 0 {
            args.append("-maxthreads unlimited");
        } else {
            args.append(format!("-maxthreads {}", threads));
        }
    }

    for (name, values) in &settings.include_traits {
        for value in values {
            args.append(format!("-trait \"{}={}\"", name, value));
        }
    }

    for (name, values) in &settings.exclude_traits {
        for value in values {
            args.append(format!("-notrait \"{}={}\"", name, value));
        }
    }

    Ok(args)
}

// Check order is also failure precedence: shadow copy, app domain, xml v1.
fn validate(settings: &TestSettings) -> Result<()> {
    if !settings.shadow_copy {
        return Err(XunitArgsError::UnsupportedOption(
            "shadow-copy disable".to_string(),
        ));
    }

    if !settings.app_domain {
        return Err(XunitArgsError::UnsupportedOption(
            "app-domain disable".to_string(),
        ));
    }

    if settings.reports.contains(&ReportFormat::XmlV1) {
        return Err(XunitArgsError::UnsupportedOption("xml-v1 report".to_string()));
    }

    Ok(())
}

fn report_path(ctx: &ExecutionContext, extension: &str) -> Result<String> {
    let path = ctx
        .report_path(extension)
        .ok_or_else(|| XunitArgsError::ProjectPath(ctx.project.display().to_string()))?;
    Ok(path.display().to_string())
}
