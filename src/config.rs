use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::license::resolver::BucketTable;
use crate::models::{BucketEntry, LicenseBucket};

/// Root configuration structure, deserialized from `.license-credits/config.toml`.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Credits file written under the source root.
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    /// License overview copied to the top of the credits file, relative to the root.
    #[serde(default = "default_overview")]
    pub overview: PathBuf,
    /// Directory holding the per-bucket license texts. Relative paths resolve
    /// against the source root.
    #[serde(default = "default_license_dir")]
    pub license_dir: PathBuf,
    /// Extensions (without the dot) of files whose headers are collected.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Relative path prefixes skipped when walking the tree.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Bucket name -> license text file inside `license_dir`.
    #[serde(default = "default_license_texts")]
    pub license_texts: BTreeMap<String, PathBuf>,
    /// Files whose non-reference header is shared with other files.
    #[serde(default = "default_buckets")]
    pub buckets: Vec<BucketEntry>,
}

fn default_output_file() -> PathBuf {
    PathBuf::from("CREDITS.chromium")
}

fn default_overview() -> PathBuf {
    PathBuf::from("LICENSE.md")
}

fn default_license_dir() -> PathBuf {
    PathBuf::from("license_texts")
}

fn default_extensions() -> Vec<String> {
    ["c", "h", "S", "asm"].iter().map(|e| e.to_string()).collect()
}

fn default_license_texts() -> BTreeMap<String, PathBuf> {
    [
        (LicenseBucket::Lgpl, "full_lgpl.txt"),
        (LicenseBucket::Mips, "mips.txt"),
        (LicenseBucket::Jpeg, "jpeg.txt"),
        (LicenseBucket::OggMaMr2005, "oggparse_ahlberg_rullgayrd_2005.txt"),
    ]
    .into_iter()
    .map(|(bucket, file)| (bucket.name().to_string(), PathBuf::from(file)))
    .collect()
}

/// FFmpeg files that are not LGPL (or just miss the similarity cutoff).
/// Digests are MD5 of the de-commented header at the time it was reviewed.
fn default_buckets() -> Vec<BucketEntry> {
    use LicenseBucket::*;

    vec![
        // LGPL, but just below the similarity cutoff.
        BucketEntry::new("libavcodec/codec_desc.c", Lgpl, "091f9c6d1efc62038e516f5c67263962"),
        // MIPS Technologies
        BucketEntry::new("libavcodec/mdct_fixed_32.c", Mips, "179c17c9dab77f95dc6540709b5fb8cd"),
        BucketEntry::new("libavcodec/fft_fixed_32.c", Mips, "179c17c9dab77f95dc6540709b5fb8cd"),
        BucketEntry::new("libavcodec/fft_init_table.c", Mips, "179c17c9dab77f95dc6540709b5fb8cd"),
        BucketEntry::new("libavcodec/mips/aacdec_mips.c", Mips, "a08afe43d908fe6625603d0cbc95da46"),
        BucketEntry::new("libavcodec/mips/sbrdsp_mips.c", Mips, "c34ece06ebe27e5a7611ef362962b048"),
        BucketEntry::new("libavcodec/mips/aacpsdsp_mips.c", Mips, "a08afe43d908fe6625603d0cbc95da46"),
        BucketEntry::new("libavutil/mips/float_dsp_mips.c", Mips, "fb9f51968ec8289768547144b920cf79"),
        BucketEntry::new("libavcodec/mips/aacsbr_mips.c", Mips, "82c53533b2576fe5d2c04880a46595f2"),
        BucketEntry::new("libavutil/fixed_dsp.c", Mips, "7a521412ac91287b3e1026885f6bd56f"),
        BucketEntry::new("libavcodec/mips/aacdec_mips.h", Mips, "c34ece06ebe27e5a7611ef362962b048"),
        BucketEntry::new("libavcodec/mips/lsp_mips.h", Mips, "eef419f576f738e66ca3bfc975a37996"),
        BucketEntry::new("libavcodec/mips/aacsbr_mips.h", Mips, "82c53533b2576fe5d2c04880a46595f2"),
        BucketEntry::new("libavutil/mips/libm_mips.h", Mips, "4b408982f2aa83fac9c020c61853bdae"),
        BucketEntry::new("libavcodec/mips/amrwbdec_mips.h", Mips, "4b408982f2aa83fac9c020c61853bdae"),
        BucketEntry::new("libavcodec/fft_table.h", Mips, "179c17c9dab77f95dc6540709b5fb8cd"),
        BucketEntry::new("libavcodec/mips/compute_antialias_float.h", Mips, "a7ff7e3157e3726cba79e022628d3b93"),
        BucketEntry::new("libavcodec/mips/compute_antialias_fixed.h", Mips, "97e366b4c71ad5ceca991d89044c414d"),
        BucketEntry::new("libavutil/softfloat_tables.h", Mips, "de3e5c962caa5c8249bef3085ef36bc8"),
        BucketEntry::new("libavutil/fixed_dsp.h", Mips, "4b408982f2aa83fac9c020c61853bdae"),
        // Independent JPEG Group
        BucketEntry::new("libavcodec/jfdctint_template.c", Jpeg, "d80cfd2e439eb700aed0f5bc44fef9b5"),
        BucketEntry::new("libavcodec/jfdctfst.c", Jpeg, "7dcfa68ad9c8fd940fb404ee3242e03f"),
        BucketEntry::new("libavcodec/jrevdct.c", Jpeg, "a9b8f5dcb74fa76a72069306b841b042"),
        // Ogg parsers by Ahlberg and Rullgård (MIT/X11)
        BucketEntry::new("libavformat/oggparseogm.c", OggMaMr2005, "ee65196bafec5d8e871e64bb739bdc79"),
        BucketEntry::new("libavformat/oggdec.c", OggMaMr2005, "43ed5da1268cb2f104095c79410fd394"),
        BucketEntry::new("libavformat/oggdec.h", OggMaMr2005, "ee65196bafec5d8e871e64bb739bdc79"),
        BucketEntry::new("libavformat/oggparsevorbis.c", OggMaMr2005, "6c432580b4486564e43cd538370e3dbc"),
    ]
}

impl Default for Config {
    /// Built-in configuration for an FFmpeg checkout, used when no config file
    /// is found.
    fn default() -> Self {
        Config {
            output_file: default_output_file(),
            overview: default_overview(),
            license_dir: default_license_dir(),
            extensions: default_extensions(),
            exclude: Vec::new(),
            license_texts: default_license_texts(),
            buckets: default_buckets(),
        }
    }
}

impl Config {
    /// Reject tables that could only fail later, halfway through a run.
    pub fn validate(&self) -> Result<()> {
        let texts = self.bucket_texts()?;

        let reference = LicenseBucket::reference();
        if !texts.contains_key(&reference) {
            bail!("license_texts has no entry for the reference bucket {}", reference);
        }

        let mut seen = HashSet::new();
        for entry in &self.buckets {
            if !seen.insert(entry.path.as_str()) {
                bail!("bucket table lists {} more than once", entry.path);
            }
            if entry.digest.len() != 32 || !entry.digest.chars().all(|c| c.is_ascii_hexdigit()) {
                bail!(
                    "digest for {} is not a 32-digit hex MD5: {}",
                    entry.path,
                    entry.digest
                );
            }
            if !texts.contains_key(&entry.license) {
                bail!(
                    "{} is bucketed as {} but license_texts has no entry for it",
                    entry.path,
                    entry.license
                );
            }
        }

        Ok(())
    }

    /// `license_texts` with parsed bucket names.
    fn bucket_texts(&self) -> Result<BTreeMap<LicenseBucket, &Path>> {
        self.license_texts
            .iter()
            .map(|(name, file)| {
                let bucket = name
                    .parse::<LicenseBucket>()
                    .map_err(anyhow::Error::msg)
                    .context("invalid key in license_texts")?;
                Ok((bucket, file.as_path()))
            })
            .collect()
    }

    /// Absolute locations of every bucket's license text.
    pub fn license_text_paths(&self, root: &Path, license_dir: Option<&Path>) -> Result<Vec<(LicenseBucket, PathBuf)>> {
        let dir = root.join(license_dir.unwrap_or(&self.license_dir));
        Ok(self
            .bucket_texts()?
            .into_iter()
            .map(|(bucket, file)| (bucket, dir.join(file)))
            .collect())
    }

    pub fn overview_path(&self, root: &Path) -> PathBuf {
        root.join(&self.overview)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_file)
    }

    pub fn bucket_table(&self) -> BucketTable {
        BucketTable::new(&self.buckets)
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<root>/.license-credits/config.toml`
/// 3. `~/.config/license-credits/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(root: &Path, config_override: Option<&Path>) -> Result<Config> {
    let config = match find_config(root, config_override) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => {
            tracing::debug!("no config file found, using built-in table");
            Config::default()
        }
    };

    config.validate()?;
    Ok(config)
}

fn find_config(root: &Path, config_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_override {
        return Some(path.to_path_buf());
    }

    let project_config = root.join(".license-credits").join("config.toml");
    if project_config.exists() {
        return Some(project_config);
    }

    let home_config = dirs::home_dir()?
        .join(".config")
        .join("license-credits")
        .join("config.toml");
    home_config.exists().then_some(home_config)
}
