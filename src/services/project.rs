use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{CoreError, Result};
use crate::model::project::ProjectInfo;
use crate::services::locations::LocationStyle;
use crate::services::translation_memory::store::write_atomic;

const PROJECT_FILE: &str = "project.json";

fn ensure_projects_dir(base: &Path) -> Result<()> {
    if !base.exists() {
        fs::create_dir_all(base)?;
    }
    Ok(())
}

/// Turns a display name (possibly a path) into a safe directory name.
fn safe_project_dir_name(name: &str) -> String {
    let mut n = name.trim().to_string();

    if n.contains('\\') || n.contains('/') {
        if let Some(bn) = Path::new(&n.replace('\\', "/")).file_name().and_then(|s| s.to_str()) {
            n = bn.to_string();
        }
    }

    let mut out = String::with_capacity(n.len());
    for ch in n.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == ' ' || ch == '_' || ch == '-' || ch == '.';
        out.push(if ok { ch } else { '_' });
    }

    let out = out.trim().trim_matches('.').to_string();
    if out.is_empty() {
        "Project".to_string()
    } else {
        out
    }
}

fn validate(project: &ProjectInfo) -> Result<()> {
    project.locations.parse::<LocationStyle>()?;
    if encoding_rs::Encoding::for_label(project.encoding.as_bytes()).is_none() {
        return Err(CoreError::Project(format!("unknown encoding '{}'", project.encoding)));
    }
    Ok(())
}

pub fn list_projects(base: &Path) -> Result<Vec<ProjectInfo>> {
    ensure_projects_dir(base)?;
    let mut projects = Vec::new();

    for entry in fs::read_dir(base)?.flatten() {
        let path = entry.path().join(PROJECT_FILE);
        if !path.exists() {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str::<ProjectInfo>(&data) {
                Ok(project) => projects.push(project),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping invalid project file"),
            },
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable project file"),
        }
    }

    projects.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(projects)
}

pub fn create_project(base: &Path, draft: ProjectInfo) -> Result<ProjectInfo> {
    if draft.name.trim().is_empty() {
        return Err(CoreError::Project("project name is required".into()));
    }
    validate(&draft)?;
    ensure_projects_dir(base)?;

    let project_dir = base.join(safe_project_dir_name(&draft.name));
    if project_dir.exists() {
        return Err(CoreError::Project("project already exists".into()));
    }

    fs::create_dir_all(&project_dir)?;

    let project = ProjectInfo {
        project_path: project_dir.to_string_lossy().to_string(),
        ..draft
    };

    write_project(&project_dir, &project)?;
    info!(name = %project.name, path = %project.project_path, "project created");

    Ok(project)
}

pub fn open_project(project_path: &Path) -> Result<ProjectInfo> {
    let path = project_path.join(PROJECT_FILE);

    if !path.exists() {
        return Err(CoreError::Project(format!("{PROJECT_FILE} not found")));
    }

    let data = fs::read_to_string(path)?;
    let project = serde_json::from_str::<ProjectInfo>(&data)
        .map_err(|e| CoreError::Project(format!("invalid {PROJECT_FILE}: {e}")))?;

    Ok(project)
}

pub fn save_project(base: &Path, mut project: ProjectInfo) -> Result<ProjectInfo> {
    if project.locations.trim().is_empty() {
        project.locations = "relative".to_string();
    }
    validate(&project)?;

    let project_dir: PathBuf = {
        let pp = project.project_path.trim().to_string();
        if pp.is_empty() {
            base.join(safe_project_dir_name(&project.name))
        } else {
            PathBuf::from(pp)
        }
    };

    fs::create_dir_all(&project_dir)?;
    project.project_path = project_dir.to_string_lossy().to_string();

    write_project(&project_dir, &project)?;
    Ok(project)
}

/// Catalog paths resolved against the project's root.
pub fn catalog_files(project: &ProjectInfo) -> Vec<PathBuf> {
    let root = Path::new(&project.root_path);
    project
        .catalog_paths
        .iter()
        .map(|p| {
            let p = Path::new(p);
            if p.is_absolute() || project.root_path.is_empty() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        })
        .collect()
}

fn write_project(dir: &Path, project: &ProjectInfo) -> Result<()> {
    let json = serde_json::to_string_pretty(project)?;
    write_atomic(&dir.join(PROJECT_FILE), json.as_bytes())
}
