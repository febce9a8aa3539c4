#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    ParseTs,
    RebuildTs,
    SaveTs,
    RunQa,
    Stats,
    Locations,
    NumerusRule,
    DetectEncoding,
    TmImport,
    TmApply,
    ProjectList,
    ProjectCreate,
    ProjectOpen,
    ProjectSave,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "ts.parse" => Command::ParseTs,
            "ts.rebuild" => Command::RebuildTs,
            "ts.save" => Command::SaveTs,
            "ts.qa" => Command::RunQa,
            "ts.stats" => Command::Stats,
            "ts.locations" => Command::Locations,
            "numerus.rule" => Command::NumerusRule,
            "encoding.detect" => Command::DetectEncoding,
            "tm.import" => Command::TmImport,
            "tm.apply" => Command::TmApply,
            "project.list" => Command::ProjectList,
            "project.create" => Command::ProjectCreate,
            "project.open" => Command::ProjectOpen,
            "project.save" => Command::ProjectSave,
            _ => Command::Unknown,
        }
    }
}

impl Command {
    pub fn is_project(self) -> bool {
        matches!(
            self,
            Command::ProjectList | Command::ProjectCreate | Command::ProjectOpen | Command::ProjectSave
        )
    }
}
