//! Configuration loading.
//!
//! Values come from an optional TOML file; the CLI overlays flags and
//! environment variables on top.
//!
//! ```toml
//! max_attempts = 5
//! output_root = "modules"
//! pause_between_attempts = false
//!
//! [llm]
//! provider = "openai"
//! model = "gpt-4o"
//!
//! [terraform]
//! runtime = "docker"
//! image = "hashicorp/terraform"
//! tag = "1.6"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use modgen_llm::{LlmProvider, LlmSettings};
use modgen_runner::{CommandRunner, ContainerCliRunner, ContainerRuntime, LocalRunner};

use crate::error::{CoreError, CoreResult};
use crate::generator::DEFAULT_MAX_ATTEMPTS;

const DEFAULT_BINARY: &str = "terraform";

/// Where terraform runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    /// Locally installed binary
    #[default]
    Local,
    /// `docker run` with the module directory mounted
    Docker,
    /// `podman run` with the module directory mounted
    Podman,
}

impl RuntimeKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Some(Self::Local),
            "docker" => Some(Self::Docker),
            "podman" => Some(Self::Podman),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Force a provider instead of picking whichever key is set
    pub provider: Option<LlmProvider>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let settings = LlmSettings::default();
        Self {
            provider: None,
            model: settings.model,
            base_url: settings.base_url,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

impl LlmConfig {
    pub fn settings(&self) -> LlmSettings {
        LlmSettings {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerraformConfig {
    pub runtime: RuntimeKind,
    /// Binary name for the local runtime
    pub binary: String,
    /// Image for container runtimes
    pub image: String,
    pub tag: String,
    /// Per-command timeout (0 = none)
    pub timeout_seconds: u64,
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeKind::Local,
            binary: DEFAULT_BINARY.to_string(),
            image: "hashicorp/terraform".to_string(),
            tag: "1.6".to_string(),
            timeout_seconds: 0,
        }
    }
}

impl TerraformConfig {
    /// Container images run their own entrypoint, so `binary` only applies
    /// to the local runtime.
    pub fn ignores_binary(&self) -> bool {
        self.runtime != RuntimeKind::Local && self.binary != DEFAULT_BINARY
    }

    /// Build the command runner for the configured runtime.
    pub async fn build_runner(&self) -> CoreResult<Arc<dyn CommandRunner>> {
        if self.ignores_binary() {
            warn!(
                "terraform.binary '{}' is ignored by the {:?} runtime (image {}:{})",
                self.binary, self.runtime, self.image, self.tag
            );
        }
        let runner: Arc<dyn CommandRunner> = match self.runtime {
            RuntimeKind::Local => Arc::new(LocalRunner::new()),
            RuntimeKind::Docker => Arc::new(
                ContainerCliRunner::detect(Some(ContainerRuntime::Docker), &self.image, &self.tag)
                    .await?,
            ),
            RuntimeKind::Podman => Arc::new(
                ContainerCliRunner::detect(Some(ContainerRuntime::Podman), &self.image, &self.tag)
                    .await?,
            ),
        };
        debug!("Terraform runner: {}", runner.describe());
        Ok(runner)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModgenConfig {
    /// Upper bound on generation attempts
    pub max_attempts: u32,
    /// Directory receiving `generated_module_<timestamp>` folders
    pub output_root: PathBuf,
    /// Wait for Enter after a failed attempt
    pub pause_between_attempts: bool,
    /// Run `terraform fmt` on the written module
    pub format_output: bool,
    pub llm: LlmConfig,
    pub terraform: TerraformConfig,
}

impl Default for ModgenConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            output_root: PathBuf::from("."),
            pause_between_attempts: true,
            format_output: false,
            llm: LlmConfig::default(),
            terraform: TerraformConfig::default(),
        }
    }
}

impl ModgenConfig {
    pub const DEFAULT_FILE: &'static str = "modgen.toml";

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `./modgen.toml` is used when
    /// present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(Self::DEFAULT_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> CoreResult<Self> {
        info!("Loading config from {:?}", path);
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| CoreError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.max_attempts == 0 {
            return Err(CoreError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(CoreError::InvalidConfig(format!(
                "llm.temperature must be between 0 and 2, got {}",
                self.llm.temperature
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(CoreError::InvalidConfig(
                "llm.max_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModgenConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert!(config.pause_between_attempts);
        assert_eq!(config.llm.max_tokens, 16384);
        assert_eq!(config.terraform.runtime, RuntimeKind::Local);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: ModgenConfig = toml::from_str(
            r#"
max_attempts = 3

[llm]
provider = "anthropic"

[terraform]
runtime = "docker"
tag = "1.9"
"#,
        )
        .unwrap();

        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.llm.provider, Some(LlmProvider::Anthropic));
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.terraform.runtime, RuntimeKind::Docker);
        assert_eq!(config.terraform.image, "hashicorp/terraform");
        assert_eq!(config.terraform.tag, "1.9");
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = ModgenConfig {
            max_attempts: 0,
            ..ModgenConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modgen.toml");
        fs::write(&path, "output_root = \"modules\"\nformat_output = true\n").unwrap();

        let config = ModgenConfig::load(Some(&path)).unwrap();

        assert_eq!(config.output_root, PathBuf::from("modules"));
        assert!(config.format_output);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = ModgenConfig::load(Some(Path::new("/no/such/modgen.toml")));
        assert!(matches!(result, Err(CoreError::Io(_))));
    }

    #[test]
    fn test_bad_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modgen.toml");
        fs::write(&path, "max_attempts = \"many\"").unwrap();

        let err = ModgenConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("modgen.toml"));
    }

    #[test]
    fn test_runtime_kind_parse() {
        assert_eq!(RuntimeKind::parse("Docker"), Some(RuntimeKind::Docker));
        assert_eq!(RuntimeKind::parse("local"), Some(RuntimeKind::Local));
        assert_eq!(RuntimeKind::parse("k8s"), None);
    }

    #[test]
    fn test_container_runtime_ignores_custom_binary() {
        let mut terraform = TerraformConfig::default();
        assert!(!terraform.ignores_binary());

        terraform.binary = "tofu".to_string();
        assert!(!terraform.ignores_binary());

        terraform.runtime = RuntimeKind::Docker;
        assert!(terraform.ignores_binary());

        terraform.binary = "terraform".to_string();
        assert!(!terraform.ignores_binary());
    }
}
