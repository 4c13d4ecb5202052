use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::error::{MemGenError, MemGenResult};
use crate::fixed_point::FixedPoint;
use crate::matrices::build_artifacts;
use crate::mem_file;
use crate::types::{ArtifactKind, ArtifactName, StateLayout};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileReport {
    pub artifact: ArtifactName,
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub rows: usize,
    pub cols: usize,
    /// Lines in the file, padding included
    pub words: usize,
    /// Row-major indices that wrapped past 16 bits
    pub wrapped: Vec<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigurationReport {
    pub state_size: usize,
    pub directory: PathBuf,
    pub files: Vec<FileReport>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationReport {
    pub dt: f64,
    pub scale: u32,
    /// Keyed by label, e.g. `4_state`
    pub configurations: BTreeMap<String, ConfigurationReport>,
}

impl GenerationReport {
    /// Label -> output directory
    pub fn output_dirs(&self) -> BTreeMap<String, PathBuf> {
        self.configurations
            .iter()
            .map(|(label, cfg)| (label.clone(), cfg.directory.clone()))
            .collect()
    }

    pub fn wrapped_total(&self) -> usize {
        self.configurations
            .values()
            .flat_map(|cfg| cfg.files.iter())
            .map(|f| f.wrapped.len())
            .sum()
    }
}

/// Generate memory images for every configured state size.
///
/// All parameters are validated up front; nothing is written if any
/// configuration is invalid. Filesystem errors abort the run and are
/// returned as-is.
pub fn generate(config: &GeneratorConfig) -> MemGenResult<GenerationReport> {
    let layouts = config.validate()?;
    let fixed = FixedPoint::new(config.scale)?;

    log::info!(
        "Generating {} configuration(s): dt={} scale={} root={}",
        layouts.len(),
        config.dt,
        config.scale,
        config.output_root.display()
    );

    let mut configurations = BTreeMap::new();
    for layout in &layouts {
        let report = generate_configuration(layout, config, &fixed)?;
        configurations.insert(layout.label(), report);
    }

    Ok(GenerationReport {
        dt: config.dt,
        scale: config.scale,
        configurations,
    })
}

/// Build, encode and write the nine artifacts for one state layout
pub fn generate_configuration(
    layout: &StateLayout,
    config: &GeneratorConfig,
    fixed: &FixedPoint,
) -> MemGenResult<ConfigurationReport> {
    let artifacts = build_artifacts(layout, config.dt, &config.noise)?;

    // Encode everything before creating the directory
    let mut encoded = Vec::with_capacity(artifacts.len());
    for artifact in &artifacts {
        let target = artifact.target_len(layout);
        encoded.push(fixed.encode_artifact(artifact, target)?);
    }

    let directory = config.output_root.join(layout.dir_name());
    fs::create_dir_all(&directory).map_err(|e| MemGenError::io(&directory, e))?;

    let mut files = Vec::with_capacity(artifacts.len());
    for (artifact, encoded) in artifacts.iter().zip(encoded) {
        let path = directory.join(artifact.name.file_name());
        mem_file::write_tokens(&path, &encoded.tokens)?;

        if !encoded.wrapped.is_empty() {
            log::warn!(
                "{}: {} of {} element(s) exceed the signed 16-bit range at scale {} and wrapped (indices {:?})",
                path.display(),
                encoded.wrapped.len(),
                encoded.data_len,
                fixed.scale(),
                encoded.wrapped
            );
        }
        log::debug!(
            "Wrote {} ({} words, {} data)",
            path.display(),
            encoded.tokens.len(),
            encoded.data_len
        );

        let (rows, cols) = artifact.shape();
        files.push(FileReport {
            artifact: artifact.name,
            kind: artifact.kind,
            path,
            rows,
            cols,
            words: encoded.tokens.len(),
            wrapped: encoded.wrapped,
        });
    }

    log::info!(
        "{}: wrote {} files to {}",
        layout.label(),
        files.len(),
        directory.display()
    );

    Ok(ConfigurationReport {
        state_size: layout.state_size(),
        directory,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> GeneratorConfig {
        GeneratorConfig {
            output_root: dir.path().to_path_buf(),
            ..GeneratorConfig::default()
        }
    }

    fn read(path: &std::path::Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_preset_layout_on_disk() {
        let dir = TempDir::new().unwrap();
        let report = generate(&config_in(&dir)).unwrap();

        let dirs = report.output_dirs();
        assert_eq!(
            dirs.keys().cloned().collect::<Vec<_>>(),
            vec!["12_state", "4_state", "6_state"]
        );
        assert_eq!(dirs["4_state"], dir.path().join("kalman_matrices_4"));

        for (label, cfg) in &report.configurations {
            assert_eq!(cfg.files.len(), 9, "{}", label);
            let n = cfg.state_size;
            for file in &cfg.files {
                let lines = read(&file.path).split('\n').count();
                let expected = match file.kind {
                    ArtifactKind::Matrix => n * n,
                    ArtifactKind::Vector => n * 4,
                };
                assert_eq!(lines, expected, "{}", file.path.display());
                assert_eq!(file.words, expected);
            }
        }
    }

    #[test]
    fn test_four_state_contents() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.state_sizes = vec![4];
        generate(&config).unwrap();

        let base = dir.path().join("kalman_matrices_4");

        let a = read(&base.join("A_matrix.mem"));
        let a_lines: Vec<&str> = a.split('\n').collect();
        assert_eq!(a_lines.len(), 16);
        assert_eq!(&a_lines[..4], &["4000", "0010", "0000", "0000"]);
        assert_eq!(a_lines[5], "4000");
        assert_eq!(a_lines[11], "0010");
        assert!(!a.ends_with('\n'));

        let z = read(&base.join("z_vector.mem"));
        let z_lines: Vec<&str> = z.split('\n').collect();
        assert_eq!(z_lines.len(), 16);
        assert_eq!(&z_lines[..4], &["4000", "8000", "C000", "0000"]);
        assert!(z_lines[4..].iter().all(|t| *t == "0000"));

        let u = read(&base.join("u_vector.mem"));
        let u_lines: Vec<&str> = u.split('\n').collect();
        assert_eq!(&u_lines[..3], &["2000", "2000", "0000"]);

        let r = read(&base.join("R_matrix.mem"));
        assert!(r.starts_with("00A4\n0000"));
        let q = read(&base.join("Q_matrix.mem"));
        assert!(q.starts_with("0CCD\n0000"));

        // B is 4x2 but padded to a full 4x4 bank
        let b = read(&base.join("B_matrix.mem"));
        let b_lines: Vec<&str> = b.split('\n').collect();
        assert_eq!(b_lines.len(), 16);
        assert_eq!(&b_lines[..4], &["0000", "0000", "0010", "0000"]);
    }

    #[test]
    fn test_two_state_control_pads_as_vector() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.state_sizes = vec![2];
        generate(&config).unwrap();

        let base = dir.path().join("kalman_matrices_2");
        let b = read(&base.join("B_matrix.mem"));
        let b_lines: Vec<&str> = b.split('\n').collect();
        assert_eq!(b_lines.len(), 8);
        assert_eq!(&b_lines[..2], &["0000", "0010"]);
        assert!(b_lines[2..].iter().all(|t| *t == "0000"));

        assert_eq!(read(&base.join("A_matrix.mem")).split('\n').count(), 4);
        assert_eq!(read(&base.join("u_vector.mem")).split('\n').count(), 8);
    }

    #[test]
    fn test_wraps_are_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.state_sizes = vec![4];
        let report = generate(&config).unwrap();

        let cfg = &report.configurations["4_state"];
        let z = cfg
            .files
            .iter()
            .find(|f| f.artifact == ArtifactName::Z)
            .unwrap();
        assert_eq!(z.wrapped, vec![1, 2, 3]);
        assert_eq!(report.wrapped_total(), 3);
    }

    #[test]
    fn test_idempotent() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let first = generate(&config).unwrap();
        let snapshot: Vec<Vec<u8>> = first
            .configurations
            .values()
            .flat_map(|c| c.files.iter())
            .map(|f| fs::read(&f.path).unwrap())
            .collect();

        let second = generate(&config).unwrap();
        let again: Vec<Vec<u8>> = second
            .configurations
            .values()
            .flat_map(|c| c.files.iter())
            .map(|f| fs::read(&f.path).unwrap())
            .collect();

        assert_eq!(snapshot, again);
    }

    #[test]
    fn test_invalid_size_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.state_sizes = vec![4, 5];

        assert!(matches!(
            generate(&config),
            Err(MemGenError::InvalidStateSize(5))
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unwritable_root_surfaces_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();

        let mut config = config_in(&dir);
        config.output_root = blocker;
        config.state_sizes = vec![4];

        assert!(matches!(generate(&config), Err(MemGenError::Io { .. })));
    }

    #[test]
    fn test_report_serializes() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.state_sizes = vec![6];
        let report = generate(&config).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["scale"], 16384);
        assert_eq!(json["configurations"]["6_state"]["files"][0]["artifact"], "A");
        assert_eq!(json["configurations"]["6_state"]["files"][6]["kind"], "Vector");
    }
}
