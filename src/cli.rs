use crate::core::config::{GeneratorConfig, NormalizeMode};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "adjgen",
    version,
    about = "Generate a power-law directed graph dataset (vertices, ranks, edges)",
    long_about = None
)]
pub struct CliArgs {
    /// Number of vertices
    #[arg(long)]
    pub size: Option<u32>,

    /// Zipf exponent used when sampling degrees
    #[arg(long, allow_negative_numbers = true)]
    pub skew: Option<f64>,

    /// Target average out-degree (and in-degree) after normalization
    #[arg(long, allow_negative_numbers = true)]
    pub avgod: Option<f64>,

    /// Largest degree the sampler can draw
    #[arg(long)]
    pub max_rank: Option<u32>,

    /// Seed for reproducible output; drawn from the OS when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding combined.txt, ranks.txt and edges.txt
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Normalize with two passes over the vertex file instead of holding it in memory
    #[arg(long)]
    pub streaming: bool,
}

impl CliArgs {
    pub fn into_config(self) -> GeneratorConfig {
        let defaults = GeneratorConfig::default();
        let cfg = GeneratorConfig {
            num_vertices: self.size.unwrap_or(defaults.num_vertices),
            skew: self.skew.unwrap_or(defaults.skew),
            avg_rank: self.avgod.unwrap_or(defaults.avg_rank),
            max_rank: self.max_rank.unwrap_or(defaults.max_rank),
            seed: self.seed,
            normalize_mode: if self.streaming {
                NormalizeMode::Streaming
            } else {
                defaults.normalize_mode
            },
            ..defaults
        };
        match self.output_dir {
            Some(dir) => cfg.with_data_dir(&dir),
            None => cfg,
        }
    }
}

const VALUE_FLAGS: [&str; 6] = ["size", "skew", "avgod", "max-rank", "seed", "output-dir"];
const SWITCH_FLAGS: [&str; 5] = ["streaming", "help", "version", "h", "V"];
const LEGACY_FLAGS: [&str; 3] = ["-size", "-skew", "-avgod"];

/// Rewrites the single-dash `-size`/`-skew`/`-avgod` spellings to their long
/// form and strips anything unrecognized. Returns the arguments to hand to
/// clap and the ones that were dropped.
pub fn normalize_args<I>(args: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut kept: Vec<String> = args.next().into_iter().collect();
    let mut ignored = Vec::new();

    while let Some(arg) = args.next() {
        let arg = if LEGACY_FLAGS.contains(&arg.as_str()) {
            format!("-{}", arg)
        } else {
            arg
        };
        let long = arg.starts_with("--");
        let name = arg
            .strip_prefix("--")
            .or_else(|| arg.strip_prefix('-'))
            .map(|rest| rest.split('=').next().unwrap_or(rest));
        let takes_value = long && name.is_some_and(|n| VALUE_FLAGS.contains(&n));
        let is_switch = name.is_some_and(|n| SWITCH_FLAGS.contains(&n) && (n.len() > 1) == long);

        if takes_value {
            let inline = arg.contains('=');
            kept.push(arg);
            if !inline {
                kept.extend(args.next());
            }
        } else if is_switch {
            kept.push(arg);
        } else {
            ignored.push(arg);
        }
    }

    (kept, ignored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("adjgen")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_legacy_flags() {
        let (kept, ignored) = normalize_args(args(&["-size", "10", "-skew", "1.5", "-avgod", "4"]));
        assert!(ignored.is_empty());

        let cfg = CliArgs::try_parse_from(kept).unwrap().into_config();
        assert_eq!(10, cfg.num_vertices);
        assert_eq!(1.5, cfg.skew);
        assert_eq!(4.0, cfg.avg_rank);
        assert_eq!(6, cfg.max_rank);
        assert_eq!(NormalizeMode::InMemory, cfg.normalize_mode);
    }

    #[test]
    fn test_long_flags() {
        let (kept, ignored) = normalize_args(args(&[
            "--size=100",
            "--max-rank",
            "12",
            "--seed",
            "3",
            "--output-dir",
            "/tmp/graph",
            "--streaming",
        ]));
        assert!(ignored.is_empty());

        let cfg = CliArgs::try_parse_from(kept).unwrap().into_config();
        assert_eq!(100, cfg.num_vertices);
        assert_eq!(12, cfg.max_rank);
        assert_eq!(Some(3), cfg.seed);
        assert_eq!(PathBuf::from("/tmp/graph"), cfg.data_dir);
        assert_eq!(NormalizeMode::Streaming, cfg.normalize_mode);
    }

    #[test]
    fn test_unrecognized_arguments_are_dropped() {
        let (kept, ignored) = normalize_args(args(&["-out", "-size", "5", "stray", "--bogus"]));
        assert_eq!(vec!["-out", "stray", "--bogus"], ignored);

        let cfg = CliArgs::try_parse_from(kept).unwrap().into_config();
        assert_eq!(5, cfg.num_vertices);
    }

    #[test]
    fn test_defaults_without_arguments() {
        let (kept, _) = normalize_args(args(&[]));
        let cfg = CliArgs::try_parse_from(kept).unwrap().into_config();
        assert_eq!(GeneratorConfig::default().num_vertices, cfg.num_vertices);
        assert_eq!(None, cfg.seed);
    }

    #[test]
    fn test_non_numeric_value_is_fatal() {
        let (kept, _) = normalize_args(args(&["-size", "lots"]));
        assert!(CliArgs::try_parse_from(kept).is_err());
    }
}
