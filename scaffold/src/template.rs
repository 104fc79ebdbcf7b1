//! Embedded template set and rendering.
//!
//! Template bodies live under `templates/` and are compiled into the binary.
//! Both the body and the destination path of an entry are minijinja templates
//! over [`TemplateVars`]. Every entry is always materialized; conditional
//! entries are removed afterwards by the prune pass, keyed by their owning
//! flag.

use std::path::PathBuf;

use anyhow::{Context, Result};
use minijinja::Environment;

use crate::vars::{Flag, TemplateVars};

/// One entry in the embedded template set.
#[derive(Debug, Clone, Copy)]
pub struct TemplateFile {
    /// Destination path relative to the project root; may contain
    /// template expressions (e.g. `src/{{ package_name }}/cli.py`).
    pub path: &'static str,
    pub body: &'static str,
    /// Flag that owns this entry, or `None` for unconditional files.
    pub flag: Option<Flag>,
}

/// A template rendered against concrete variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub relative_path: PathBuf,
    pub contents: String,
}

static TEMPLATES: &[TemplateFile] = &[
    TemplateFile {
        path: "pyproject.toml",
        body: include_str!("../templates/pyproject.toml.j2"),
        flag: None,
    },
    TemplateFile {
        path: "README.md",
        body: include_str!("../templates/README.md.j2"),
        flag: None,
    },
    TemplateFile {
        path: ".gitignore",
        body: include_str!("../templates/gitignore.j2"),
        flag: None,
    },
    TemplateFile {
        path: "src/{{ package_name }}/__init__.py",
        body: include_str!("../templates/package_init.py.j2"),
        flag: None,
    },
    TemplateFile {
        path: "src/{{ package_name }}/cli.py",
        body: include_str!("../templates/cli.py.j2"),
        flag: Some(Flag::IncludeCli),
    },
    TemplateFile {
        path: "src/{{ package_name }}/api/__init__.py",
        body: include_str!("../templates/api_init.py.j2"),
        flag: Some(Flag::IncludeApi),
    },
    TemplateFile {
        path: "src/{{ package_name }}/api/app.py",
        body: include_str!("../templates/api_app.py.j2"),
        flag: Some(Flag::IncludeApi),
    },
    TemplateFile {
        path: "scripts/serve.sh",
        body: include_str!("../templates/serve.sh.j2"),
        flag: Some(Flag::IncludeApi),
    },
    TemplateFile {
        path: "src/{{ package_name }}/experiments.py",
        body: include_str!("../templates/experiments.py.j2"),
        flag: Some(Flag::IncludeAiResearch),
    },
    TemplateFile {
        path: "run_pipeline.py",
        body: include_str!("../templates/run_pipeline.py.j2"),
        flag: Some(Flag::IncludeAiResearch),
    },
    TemplateFile {
        path: "data/.gitkeep",
        body: "",
        flag: Some(Flag::IncludeAiResearch),
    },
    TemplateFile {
        path: "experiments/runs/.gitkeep",
        body: "",
        flag: Some(Flag::IncludeAiResearch),
    },
    TemplateFile {
        path: "notebooks/.gitkeep",
        body: "",
        flag: Some(Flag::IncludeAiResearch),
    },
    TemplateFile {
        path: "reports/.gitkeep",
        body: "",
        flag: Some(Flag::IncludeAiResearch),
    },
    TemplateFile {
        path: "tests/conftest.py",
        body: include_str!("../templates/conftest.py.j2"),
        flag: None,
    },
    TemplateFile {
        path: "tests/test_cli.py",
        body: include_str!("../templates/test_cli.py.j2"),
        flag: Some(Flag::IncludeCli),
    },
    TemplateFile {
        path: "tests/test_api.py",
        body: include_str!("../templates/test_api.py.j2"),
        flag: Some(Flag::IncludeApi),
    },
    TemplateFile {
        path: "tests/test_models.py",
        body: include_str!("../templates/test_models.py.j2"),
        flag: Some(Flag::IncludeAiResearch),
    },
    TemplateFile {
        path: "tests/test_train.py",
        body: include_str!("../templates/test_train.py.j2"),
        flag: Some(Flag::IncludeAiResearch),
    },
];

/// The full embedded template set, in materialization order.
pub fn template_set() -> &'static [TemplateFile] {
    TEMPLATES
}

/// Render every template entry against the given variables.
pub fn render(vars: &TemplateVars) -> Result<Vec<RenderedFile>> {
    vars.validate()?;
    let env = Environment::new();
    let mut rendered = Vec::with_capacity(TEMPLATES.len());
    for file in TEMPLATES {
        let path = env
            .render_str(file.path, vars)
            .with_context(|| format!("render path {}", file.path))?;
        let contents = env
            .render_str(file.body, vars)
            .with_context(|| format!("render template {}", file.path))?;
        rendered.push(RenderedFile {
            relative_path: PathBuf::from(path),
            contents,
        });
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::FlagSet;
    use std::path::Path;

    fn test_vars() -> TemplateVars {
        TemplateVars {
            project_name: "Demo Project".to_string(),
            package_name: "demo".to_string(),
            flags: FlagSet::default(),
        }
    }

    fn find<'a>(files: &'a [RenderedFile], path: &str) -> &'a RenderedFile {
        files
            .iter()
            .find(|file| file.relative_path == Path::new(path))
            .unwrap_or_else(|| panic!("missing {path}"))
    }

    #[test]
    fn renders_templated_paths() {
        let files = render(&test_vars()).expect("render");
        assert_eq!(files.len(), TEMPLATES.len());
        find(&files, "src/demo/cli.py");
        find(&files, "src/demo/api/app.py");
    }

    #[test]
    fn substitutes_variables_in_bodies() {
        let files = render(&test_vars()).expect("render");
        let readme = find(&files, "README.md");
        assert!(readme.contents.contains("# Demo Project"));
        let serve = find(&files, "scripts/serve.sh");
        assert!(serve.contents.contains("demo.api.app:app"));
    }

    #[test]
    fn pyproject_tracks_flags() {
        let mut vars = test_vars();
        let files = render(&vars).expect("render");
        let pyproject = find(&files, "pyproject.toml");
        assert!(pyproject.contents.contains("fastapi"));
        assert!(pyproject.contents.contains("[project.scripts]"));

        vars.flags.include_api = false;
        vars.flags.include_cli = false;
        let files = render(&vars).expect("render");
        let pyproject = find(&files, "pyproject.toml");
        assert!(!pyproject.contents.contains("fastapi"));
        assert!(!pyproject.contents.contains("[project.scripts]"));
    }

    #[test]
    fn rejects_invalid_vars() {
        let mut vars = test_vars();
        vars.package_name = "Bad Name".to_string();
        assert!(render(&vars).is_err());
    }

    #[test]
    fn every_conditional_entry_names_its_flag() {
        for file in template_set() {
            if file.path.contains("api") || file.path.contains("cli") {
                assert!(file.flag.is_some(), "{} should be conditional", file.path);
            }
        }
    }
}
