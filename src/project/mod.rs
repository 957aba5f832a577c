//! Xcode project model
//!
//! A [`Project`] is a loaded `project.pbxproj`. It exposes the targets reachable
//! from the root project object and their build phases, and lets callers
//! replace the `shellScript` of shell-script phases. Edits are kept in memory
//! until [`Project::save`] writes them back; everything else in the file is
//! preserved byte for byte.

mod error;
mod phase;

pub use error::ProjectError;
pub use phase::{BuildPhase, BuildPhaseKind, Target};

use crate::fs::FileSystem;
use crate::pbxproj::{self, Dictionary, PlistString, Value};
use std::collections::{BTreeMap, HashSet};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File inside an `.xcodeproj` bundle that holds the project description
pub const DESCRIPTOR_FILE: &str = "project.pbxproj";

const SHELL_SCRIPT_KEY: &str = "shellScript";

#[derive(Debug)]
pub struct Project {
    bundle_path: PathBuf,
    descriptor_path: PathBuf,
    source: String,
    objects: Dictionary,
    root_object_id: String,
    edits: BTreeMap<String, String>,
}

impl Project {
    /// Loads the project in `bundle_path`, which may name either the
    /// `.xcodeproj` directory or its `project.pbxproj` directly.
    pub fn open(fs: &dyn FileSystem, bundle_path: &Path) -> Result<Self, ProjectError> {
        let (bundle_path, descriptor_path) = if fs.is_dir(bundle_path) {
            (bundle_path.to_path_buf(), bundle_path.join(DESCRIPTOR_FILE))
        } else if fs.is_file(bundle_path) {
            let bundle = bundle_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| bundle_path.to_path_buf());
            (bundle, bundle_path.to_path_buf())
        } else {
            return Err(ProjectError::Io {
                path: bundle_path.to_path_buf(),
                source: "no such file or directory".into(),
            });
        };

        if !fs.exists(&descriptor_path) {
            return Err(ProjectError::MissingKey {
                path: bundle_path,
                key: DESCRIPTOR_FILE,
                context: "project bundle".to_string(),
            });
        }

        let source = fs
            .read_to_string(&descriptor_path)
            .map_err(|e| ProjectError::Io {
                path: descriptor_path.clone(),
                source: e.into(),
            })?;

        let mut project = Self::from_source(descriptor_path, source)?;
        project.bundle_path = bundle_path;
        Ok(project)
    }

    /// Builds a project from descriptor text already in memory.
    pub fn from_source(descriptor_path: PathBuf, source: String) -> Result<Self, ProjectError> {
        let root = pbxproj::parse(&source).map_err(|e| ProjectError::Parse {
            path: descriptor_path.clone(),
            source: e,
        })?;

        let root = match root {
            Value::Dictionary(dict) => dict,
            other => {
                return Err(ProjectError::UnexpectedType {
                    path: descriptor_path,
                    key: "<root>".to_string(),
                    expected: "dictionary",
                    found: other.type_name(),
                })
            }
        };

        let root_object_id = match root.get("rootObject") {
            Some(Value::String(id)) => id.value.clone(),
            Some(other) => {
                return Err(ProjectError::UnexpectedType {
                    path: descriptor_path,
                    key: "rootObject".to_string(),
                    expected: "string",
                    found: other.type_name(),
                })
            }
            None => {
                return Err(ProjectError::MissingKey {
                    path: descriptor_path,
                    key: "rootObject",
                    context: "the project root".to_string(),
                })
            }
        };

        let objects = match root.entries.into_iter().find(|(k, _)| k.value == "objects") {
            Some((_, Value::Dictionary(objects))) => objects,
            Some((_, other)) => {
                return Err(ProjectError::UnexpectedType {
                    path: descriptor_path,
                    key: "objects".to_string(),
                    expected: "dictionary",
                    found: other.type_name(),
                })
            }
            None => {
                return Err(ProjectError::MissingKey {
                    path: descriptor_path,
                    key: "objects",
                    context: "the project root".to_string(),
                })
            }
        };

        if objects.get_dict(&root_object_id).is_none() {
            return Err(ProjectError::DanglingReference {
                path: descriptor_path,
                id: root_object_id,
                context: "rootObject".to_string(),
            });
        }

        debug!(
            path = %descriptor_path.display(),
            objects = objects.len(),
            "Loaded project descriptor"
        );

        let bundle_path = descriptor_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            bundle_path,
            descriptor_path,
            source,
            objects,
            root_object_id,
            edits: BTreeMap::new(),
        })
    }

    pub fn bundle_path(&self) -> &Path {
        &self.bundle_path
    }

    pub fn descriptor_path(&self) -> &Path {
        &self.descriptor_path
    }

    /// Bundle directory name, e.g. `App.xcodeproj`
    pub fn name(&self) -> String {
        self.bundle_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.bundle_path.display().to_string())
    }

    /// Targets in the order the root project object lists them.
    pub fn targets(&self) -> Vec<Target> {
        let target_ids = self
            .objects
            .get_dict(&self.root_object_id)
            .and_then(|root| root.get_array("targets"))
            .unwrap_or_default();

        target_ids
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|id| match self.objects.get_dict(id) {
                Some(object) => Some(Target {
                    id: id.to_string(),
                    name: object
                        .get_str("name")
                        .or_else(|| object.get_str("productName"))
                        .unwrap_or(id)
                        .to_string(),
                    build_phase_ids: object
                        .get_array("buildPhases")
                        .unwrap_or_default()
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect(),
                }),
                None => {
                    warn!(
                        path = %self.descriptor_path.display(),
                        target = id,
                        "Skipping target missing from objects"
                    );
                    None
                }
            })
            .collect()
    }

    /// Build phases of `target`, in build order.
    pub fn build_phases(&self, target: &Target) -> Vec<BuildPhase> {
        target
            .build_phase_ids
            .iter()
            .filter_map(|id| match self.phase(id) {
                Some(phase) => Some(phase),
                None => {
                    warn!(
                        path = %self.descriptor_path.display(),
                        target = %target.name,
                        phase = %id,
                        "Skipping build phase missing from objects"
                    );
                    None
                }
            })
            .collect()
    }

    /// Every shell-script phase across all targets, each listed once even when
    /// several targets share it.
    pub fn shell_script_phases(&self) -> Vec<BuildPhase> {
        let mut seen = HashSet::new();
        self.targets()
            .iter()
            .flat_map(|target| self.build_phases(target))
            .filter(|phase| phase.is_shell_script() && seen.insert(phase.id.clone()))
            .collect()
    }

    pub fn phase(&self, id: &str) -> Option<BuildPhase> {
        self.objects.get_dict(id).map(|object| BuildPhase {
            id: id.to_string(),
            kind: BuildPhaseKind::from_isa(object.get_str("isa").unwrap_or_default()),
            name: object.get_str("name").map(str::to_string),
        })
    }

    /// Current script text of a shell-script phase, including unsaved edits.
    /// A phase without a `shellScript` entry has an empty script.
    pub fn shell_script(&self, phase_id: &str) -> Result<&str, ProjectError> {
        if let Some(edited) = self.edits.get(phase_id) {
            return Ok(edited.as_str());
        }
        let (_, token) = self.script_token(phase_id)?;
        Ok(token.map(PlistString::as_str).unwrap_or_default())
    }

    /// Records a new script for a shell-script phase. Nothing is written until
    /// [`Project::save`].
    pub fn set_shell_script(
        &mut self,
        phase_id: &str,
        script: impl Into<String>,
    ) -> Result<(), ProjectError> {
        let script = script.into();
        let (_, token) = self.script_token(phase_id)?;
        let original = token.map(PlistString::as_str).unwrap_or_default();

        if original == script && token.is_some() {
            self.edits.remove(phase_id);
        } else {
            self.edits.insert(phase_id.to_string(), script);
        }
        Ok(())
    }

    pub fn is_modified(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Descriptor text with all pending edits applied.
    pub fn render(&self) -> Result<String, ProjectError> {
        let mut splices: Vec<(Range<usize>, String)> = Vec::with_capacity(self.edits.len());

        for (id, script) in &self.edits {
            let (object, token) = self.script_token(id)?;
            match token {
                Some(token) => splices.push((token.span.clone(), pbxproj::quote(script))),
                None => {
                    let at = object.closing_brace();
                    splices.push((
                        at..at,
                        format!("{} = {}; ", SHELL_SCRIPT_KEY, pbxproj::quote(script)),
                    ));
                }
            }
        }

        splices.sort_by(|a, b| b.0.start.cmp(&a.0.start));

        let mut rendered = self.source.clone();
        for (range, replacement) in splices {
            rendered.replace_range(range, &replacement);
        }
        Ok(rendered)
    }

    /// Writes the descriptor back to disk.
    pub fn save(&self, fs: &dyn FileSystem) -> Result<(), ProjectError> {
        let rendered = self.render()?;
        fs.write(&self.descriptor_path, &rendered)
            .map_err(|e| ProjectError::Io {
                path: self.descriptor_path.clone(),
                source: e.into(),
            })?;

        debug!(
            path = %self.descriptor_path.display(),
            edits = self.edits.len(),
            "Saved project descriptor"
        );
        Ok(())
    }

    fn script_token(
        &self,
        phase_id: &str,
    ) -> Result<(&Dictionary, Option<&PlistString>), ProjectError> {
        let object = self
            .objects
            .get_dict(phase_id)
            .filter(|o| o.get_str("isa") == Some(BuildPhaseKind::ShellScript.isa()))
            .ok_or_else(|| ProjectError::NotShellScriptPhase {
                path: self.descriptor_path.clone(),
                id: phase_id.to_string(),
            })?;

        match object.get(SHELL_SCRIPT_KEY) {
            None => Ok((object, None)),
            Some(Value::String(token)) => Ok((object, Some(token))),
            Some(other) => Err(ProjectError::UnexpectedType {
                path: self.descriptor_path.clone(),
                key: format!("{}.{}", phase_id, SHELL_SCRIPT_KEY),
                expected: "string",
                found: other.type_name(),
            }),
        }
    }
}
