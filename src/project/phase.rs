use serde::Serialize;

/// Build phase kinds, decoded from the object's `isa`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BuildPhaseKind {
    ShellScript,
    Sources,
    Frameworks,
    Resources,
    Headers,
    CopyFiles,
    Other(String),
}

impl BuildPhaseKind {
    pub fn from_isa(isa: &str) -> Self {
        match isa {
            "PBXShellScriptBuildPhase" => BuildPhaseKind::ShellScript,
            "PBXSourcesBuildPhase" => BuildPhaseKind::Sources,
            "PBXFrameworksBuildPhase" => BuildPhaseKind::Frameworks,
            "PBXResourcesBuildPhase" => BuildPhaseKind::Resources,
            "PBXHeadersBuildPhase" => BuildPhaseKind::Headers,
            "PBXCopyFilesBuildPhase" => BuildPhaseKind::CopyFiles,
            other => BuildPhaseKind::Other(other.to_string()),
        }
    }

    pub fn isa(&self) -> &str {
        match self {
            BuildPhaseKind::ShellScript => "PBXShellScriptBuildPhase",
            BuildPhaseKind::Sources => "PBXSourcesBuildPhase",
            BuildPhaseKind::Frameworks => "PBXFrameworksBuildPhase",
            BuildPhaseKind::Resources => "PBXResourcesBuildPhase",
            BuildPhaseKind::Headers => "PBXHeadersBuildPhase",
            BuildPhaseKind::CopyFiles => "PBXCopyFilesBuildPhase",
            BuildPhaseKind::Other(isa) => isa,
        }
    }

    /// Name Xcode tooling shows for a phase that has no `name` of its own
    pub fn default_name(&self) -> &str {
        let isa = self.isa();
        let trimmed = isa.strip_prefix("PBX").unwrap_or(isa);
        let trimmed = trimmed.strip_suffix("BuildPhase").unwrap_or(trimmed);
        if trimmed.is_empty() {
            isa
        } else {
            trimmed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPhase {
    pub id: String,
    pub kind: BuildPhaseKind,
    pub name: Option<String>,
}

impl BuildPhase {
    pub fn is_shell_script(&self) -> bool {
        self.kind == BuildPhaseKind::ShellScript
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.kind.default_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: String,
    pub name: String,
    pub build_phase_ids: Vec<String>,
}
