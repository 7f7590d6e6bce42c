use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Resolved filesystem context for one synthesis call.
///
/// Resolution is purely lexical: no component of this type touches the
/// filesystem, so a context can describe paths that do not exist yet.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub project: PathBuf,
    pub output_dir: PathBuf,
    pub working_dir: PathBuf,
}

impl ExecutionContext {
    pub fn new(
        project: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project: project.into(),
            output_dir: output_dir.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Makes `path` absolute against the working directory and normalizes
    /// `.` and `..` components lexically.
    pub fn resolve_absolute(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        };
        normalize(&joined)
    }

    /// Absolute path of a report file with the given extension.
    ///
    /// The base name is the last segment of the directory *containing* the
    /// project file, not the project file name. Sibling projects under
    /// like-named leaf directories will collide on report filenames; the
    /// report-consuming tooling expects exactly this naming.
    ///
    /// Returns `None` when the project path has no containing-directory
    /// name to derive from.
    pub fn report_path(&self, extension: &str) -> Option<PathBuf> {
        let dir_name = self.project.parent()?.file_name()?;
        let mut file_name = OsString::from(dir_name);
        file_name.push(".");
        file_name.push(extension);
        Some(self.resolve_absolute(&self.output_dir).join(file_name))
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at a root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(Component::ParentDir),
            },
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(project: &str, output_dir: &str, working_dir: &str) -> ExecutionContext {
        ExecutionContext::new(project, output_dir, working_dir)
    }

    #[test]
    fn absolute_paths_pass_through() {
        let ctx = ctx("tests/My.csproj", "/out", "/work");
        assert_eq!(
            ctx.resolve_absolute(Path::new("/out/reports")),
            PathBuf::from("/out/reports")
        );
    }

    #[test]
    fn relative_paths_resolve_against_working_dir() {
        let ctx = ctx("tests/My.csproj", "out", "/work");
        assert_eq!(
            ctx.resolve_absolute(Path::new("out/reports")),
            PathBuf::from("/work/out/reports")
        );
    }

    #[test]
    fn dot_components_normalize_away() {
        let ctx = ctx("tests/My.csproj", "out", "/work");
        assert_eq!(
            ctx.resolve_absolute(Path::new("./a/../b/./c")),
            PathBuf::from("/work/b/c")
        );
    }

    #[test]
    fn parent_of_root_stays_at_root() {
        let ctx = ctx("tests/My.csproj", "out", "/");
        assert_eq!(
            ctx.resolve_absolute(Path::new("../../x")),
            PathBuf::from("/x")
        );
    }

    #[test]
    fn report_name_comes_from_project_directory() {
        let ctx = ctx("src/MyTests/MyTests.csproj", "/out", "/work");
        assert_eq!(
            ctx.report_path("xml"),
            Some(PathBuf::from("/out/MyTests.xml"))
        );
        assert_eq!(
            ctx.report_path("html"),
            Some(PathBuf::from("/out/MyTests.html"))
        );
    }

    #[test]
    fn report_path_resolves_relative_output_dir() {
        let ctx = ctx("src/MyTests/MyTests.csproj", "reports", "/work");
        assert_eq!(
            ctx.report_path("xml"),
            Some(PathBuf::from("/work/reports/MyTests.xml"))
        );
    }

    #[test]
    fn bare_project_file_has_no_report_name() {
        let ctx_bare = ctx("My.csproj", "/out", "/work");
        assert_eq!(ctx_bare.report_path("xml"), None);

        let ctx_rooted = ctx("/My.csproj", "/out", "/work");
        assert_eq!(ctx_rooted.report_path("xml"), None);
    }
}
