use crate::classifier::Classifier;
use crate::config::{load_roster, load_settings, resolve_api_key, ConfigError, Settings};
use crate::corpus::WalkReport;
use crate::oracle::ChatCompletionsOracle;
use crate::segmenter::Segmenter;
use crate::shared::EventLog;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub prefix: Option<String>,
    pub quiet: bool,
    pub positional: Vec<String>,
}

pub fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("`--config` requires a path")?;
                options.config = Some(PathBuf::from(value));
            }
            "--prefix" => {
                let value = iter.next().ok_or("`--prefix` requires a value")?;
                options.prefix = Some(value.clone());
            }
            "--quiet" => options.quiet = true,
            other if other.starts_with("--") => return Err(format!("unknown flag `{other}`")),
            other => options.positional.push(other.to_string()),
        }
    }
    Ok(options)
}

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

/// Settings, log sink and oracle client shared by the pipeline commands.
pub struct PipelineContext {
    pub settings: Settings,
    pub log: EventLog,
    pub oracle: ChatCompletionsOracle,
}

impl PipelineContext {
    pub fn load(options: &CliOptions) -> Result<Self, String> {
        let cwd = std::env::current_dir().map_err(|e| e.to_string())?;
        let settings = load_settings(options.config.as_deref(), &cwd).map_err(map_config_err)?;
        let api_key = resolve_api_key(&settings).map_err(map_config_err)?;
        let log = EventLog::to_file(&settings.paths.log_file).with_echo(!options.quiet);
        let oracle = ChatCompletionsOracle::new(settings.oracle_endpoint(api_key));
        Ok(Self {
            settings,
            log,
            oracle,
        })
    }

    pub fn segmenter(&self) -> Segmenter<&ChatCompletionsOracle> {
        Segmenter::new(&self.oracle, self.settings.segmenter_config()).with_log(self.log.clone())
    }

    pub fn classifier(&self) -> Result<Classifier<&ChatCompletionsOracle>, String> {
        let roster = load_roster(&self.settings).map_err(map_config_err)?;
        Ok(
            Classifier::new(&self.oracle, self.settings.classifier_config(roster))
                .with_log(self.log.clone()),
        )
    }

    /// `--prefix` wins over `paths.input_prefix`.
    pub fn input_prefix<'a>(&'a self, options: &'a CliOptions) -> Option<&'a str> {
        options
            .prefix
            .as_deref()
            .or(self.settings.paths.input_prefix.as_deref())
    }
}

pub fn render_report(stage: &str, report: &WalkReport) -> String {
    let mut lines = vec![format!("{stage} finished")];
    lines.extend(report.summary_lines());
    lines.join("\n")
}
