//! llbuild manifest synthesis
//!
//! A compile/link task becomes a two-command llbuild graph. The compile
//! command declares one object per source and a `<atllbuild-swiftc>` marker;
//! the link command consumes that marker, the objects and any linked
//! products. Declaring inputs and outputs per phase is what lets the
//! executor skip recompiling or relinking when nothing relevant changed.

use crate::tools::atllbuild::workspace::Workspace;
use crate::tools::atllbuild::OutputType;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Identifier of the compile phase
pub const COMPILE_PHASE: &str = "<atllbuild-swiftc>";

/// Identifier of the link phase
pub const LINK_PHASE: &str = "<atllbuild>";

/// Named target that builds the link phase
pub const TARGET_NAME: &str = "atllbuild";

/// Client the executor expects
pub const CLIENT_NAME: &str = "swift-build";

/// Everything needed to describe one module build
#[derive(Debug, Clone)]
pub struct ManifestRequest<'a> {
    pub module_name: &'a str,
    pub sources: &'a [PathBuf],
    pub workspace: &'a Workspace,
    pub output_type: OutputType,
    pub compile_options: &'a [String],
    pub link_with_product: &'a [String],
    /// SDK to compile against, already filtered by `linkSDK` and platform
    pub sdk_path: Option<&'a Path>,
    pub swiftc: &'a Path,
}

/// A complete llbuild manifest
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub client: Client,
    pub tools: BTreeMap<String, String>,
    pub targets: BTreeMap<String, Vec<String>>,
    pub commands: Commands,
}

#[derive(Debug, Clone, Serialize)]
pub struct Client {
    pub name: String,
}

/// The two phases, keyed by their identifiers
#[derive(Debug, Clone)]
pub struct Commands {
    pub compile: CompileCommand,
    pub link: LinkCommand,
}

impl Serialize for Commands {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(COMPILE_PHASE, &self.compile)?;
        map.serialize_entry(LINK_PHASE, &self.link)?;
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompileCommand {
    pub tool: String,
    pub executable: String,
    pub inputs: Vec<String>,
    pub sources: Vec<String>,
    pub objects: Vec<String>,
    pub outputs: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_library: bool,
    pub module_name: String,
    pub module_output_path: String,
    pub temps_path: String,
    pub other_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkCommand {
    pub tool: String,
    pub executable: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub args: Vec<String>,
    pub description: String,
}

impl Manifest {
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Build the manifest for one module
pub fn synthesize(request: &ManifestRequest<'_>) -> Manifest {
    let workspace = request.workspace;
    let sources: Vec<String> = request.sources.iter().map(|p| display(p)).collect();
    let objects: Vec<String> = request
        .sources
        .iter()
        .map(|source| display(&workspace.object_path(source)))
        .collect();
    let products: Vec<String> = request
        .link_with_product
        .iter()
        .map(|product| display(&workspace.products_dir().join(product)))
        .collect();
    let swiftc = display(request.swiftc);

    let compile = CompileCommand {
        tool: "swift-compiler".to_string(),
        executable: swiftc.clone(),
        inputs: sources.clone(),
        sources,
        objects: objects.clone(),
        outputs: marker_then(COMPILE_PHASE, &objects),
        is_library: request.output_type == OutputType::StaticLibrary,
        module_name: request.module_name.to_string(),
        module_output_path: display(
            &workspace
                .products_dir()
                .join(format!("{}.swiftmodule", request.module_name)),
        ),
        temps_path: display(&workspace.temps_dir()),
        other_args: compile_args(request),
    };

    let mut inputs = marker_then(COMPILE_PHASE, &objects);
    inputs.extend(products.iter().cloned());

    let artifact = display(&workspace.artifact_path(request.module_name, request.output_type));
    let link = match request.output_type {
        OutputType::Executable => {
            let mut args = vec![swiftc.clone(), "-o".to_string(), artifact.clone()];
            args.extend(objects.iter().cloned());
            args.extend(products.iter().cloned());
            LinkCommand {
                tool: "shell".to_string(),
                executable: swiftc,
                inputs,
                outputs: vec![LINK_PHASE.to_string(), artifact.clone()],
                args,
                description: format!("Linking executable {}", artifact),
            }
        }
        OutputType::StaticLibrary => {
            let mut script = format!("rm -rf {}; ar cr {}", shell_quote(&artifact), shell_quote(&artifact));
            for object in &objects {
                script.push(' ');
                script.push_str(&shell_quote(object));
            }
            LinkCommand {
                tool: "shell".to_string(),
                executable: "/bin/sh".to_string(),
                inputs,
                outputs: vec![LINK_PHASE.to_string(), artifact.clone()],
                args: vec!["/bin/sh".to_string(), "-c".to_string(), script],
                description: format!("Linking library {}", artifact),
            }
        }
    };

    let mut targets = BTreeMap::new();
    targets.insert(String::new(), vec![LINK_PHASE.to_string()]);
    targets.insert(TARGET_NAME.to_string(), vec![LINK_PHASE.to_string()]);

    Manifest {
        client: Client {
            name: CLIENT_NAME.to_string(),
        },
        tools: BTreeMap::new(),
        targets,
        commands: Commands { compile, link },
    }
}

/// Compile flags; later flags may override earlier ones, so order is fixed
fn compile_args(request: &ManifestRequest<'_>) -> Vec<String> {
    let mut args = vec![
        "-j8".to_string(),
        "-D".to_string(),
        "ATBUILD".to_string(),
        "-I".to_string(),
        display(&request.workspace.products_dir()),
    ];
    if let Some(sdk) = request.sdk_path {
        args.push("-sdk".to_string());
        args.push(display(sdk));
    }
    args.extend(request.compile_options.iter().cloned());
    args
}

fn marker_then(marker: &str, paths: &[String]) -> Vec<String> {
    let mut list = Vec::with_capacity(paths.len() + 1);
    list.push(marker.to_string());
    list.extend(paths.iter().cloned());
    list
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// Single-quote a string for `/bin/sh`
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
