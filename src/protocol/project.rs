use std::path::Path;

use serde_json::{json, Value};

use super::command::Command;
use crate::config::CoreConfig;
use crate::error::{CoreError, Result};
use crate::model::project::ProjectInfo;
use crate::services::project as service;

fn project_from(payload: &Value) -> Result<ProjectInfo> {
    let project_val = payload.get("project").cloned().unwrap_or(Value::Null);
    if project_val.is_null() {
        return Err(CoreError::InvalidRequest("payload.project is required".into()));
    }

    serde_json::from_value(project_val)
        .map_err(|e| CoreError::InvalidRequest(format!("invalid payload.project: {e}")))
}

pub fn handle(cmd: Command, payload: &Value, config: &CoreConfig) -> Result<Value> {
    let base = config.projects_dir.as_path();

    match cmd {
        Command::ProjectList => {
            let projects = service::list_projects(base)?;
            Ok(json!({ "projects": projects }))
        }

        Command::ProjectCreate => {
            let project = service::create_project(base, project_from(payload)?)?;
            Ok(json!({ "project_path": project.project_path, "project": project }))
        }

        Command::ProjectOpen => {
            let path = payload
                .get("project_path")
                .and_then(|v| v.as_str())
                .filter(|p| !p.is_empty())
                .ok_or_else(|| CoreError::InvalidRequest("payload.project_path is required".into()))?;

            let project = service::open_project(Path::new(path))?;
            let catalogs: Vec<String> = service::catalog_files(&project)
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect();
            Ok(json!({ "project": project, "catalog_files": catalogs }))
        }

        Command::ProjectSave => {
            let saved = service::save_project(base, project_from(payload)?)?;
            Ok(json!({ "project": saved }))
        }

        other => Err(CoreError::InvalidRequest(format!("{other:?} is not a project command"))),
    }
}
