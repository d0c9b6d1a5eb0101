// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # INI order repository
//!
//! Implements [`OrderRepository`] over the order `.cfg` file, grounded on
//! `web_qsub.py`'s direct `ConfigParser` reads: a `DEFAULT` section of
//! order-wide fields (Python's `ConfigParser` inheritance model, mirrored
//! here by falling back to the `ini` crate's general section whenever a
//! named section omits a key) plus one section per flightline.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ini::Ini;

use scops_domain::entities::line_record::LineRecord;
use scops_domain::entities::order::{Order, SubmissionFlags};
use scops_domain::error::ScopsError;
use scops_domain::value_objects::band_range::BandRange;
use scops_domain::value_objects::line_name::LineKey;
use scops_domain::value_objects::order_id::OrderId;
use scops_domain::value_objects::projection::Projection;

const DEFAULT_SECTION: Option<&str> = None;

fn load_ini(path: &Path) -> Result<Ini, ScopsError> {
    Ini::load_from_file(path).map_err(|e| ScopsError::InvalidOrderFile(format!("{}: {e}", path.display())))
}

fn default_get<'a>(ini: &'a Ini, key: &str) -> Option<&'a str> {
    ini.section(DEFAULT_SECTION).and_then(|s| s.get(key))
}

fn default_required<'a>(ini: &'a Ini, key: &str) -> Result<&'a str, ScopsError> {
    default_get(ini, key).ok_or_else(|| ScopsError::InvalidOrderFile(format!("missing DEFAULT field: {key}")))
}

fn bool_field(ini: &Ini, section: Option<&str>, key: &str) -> bool {
    ini.section(section)
        .and_then(|s| s.get(key))
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn section_value_or_default<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.section(Some(section)).and_then(|s| s.get(key)).or_else(|| default_get(ini, key))
}

fn parse_order(path: &Path, ini: &Ini) -> Result<Order, ScopsError> {
    let project_code = default_required(ini, "project_code")?.to_string();
    let year = default_required(ini, "year")?.to_string();
    let julian_day = default_required(ini, "julianday")?.to_string();
    let sortie = default_get(ini, "sortie").filter(|s| !s.is_empty()).map(str::to_string);

    let id_text = default_get(ini, "output_folder")
        .and_then(|folder| Path::new(folder).file_name())
        .and_then(|name| name.to_str())
        .unwrap_or(&project_code);
    let id = OrderId::parse(id_text)?;

    let projection_text = default_required(ini, "projection")?;
    let projection = Projection::parse(projection_text)?;

    let source_folder = default_required(ini, "source_folder")?.to_string();
    let output_folder = default_get(ini, "output_folder").unwrap_or_default().to_string();
    let dem_source = default_get(ini, "dem").unwrap_or("generated").to_string();
    let dem_name = default_get(ini, "dem_name").filter(|s| !s.is_empty()).map(str::to_string);
    let email = default_required(ini, "email")?.to_string();

    let pixel_x: f64 = default_get(ini, "pixel_size_x").unwrap_or("2.0").parse().unwrap_or(2.0);
    let pixel_y: f64 = default_get(ini, "pixel_size_y").unwrap_or("2.0").parse().unwrap_or(2.0);

    let interpolation = default_get(ini, "interpolation").unwrap_or("nearest neighbour").to_string();
    let aplmap_ignore_freespace = bool_field(ini, DEFAULT_SECTION, "aplmap_ignore_freespace");
    let declared_filesize_gb = default_get(ini, "filesize_gb").and_then(|v| v.parse().ok());

    let flags = SubmissionFlags {
        submitted: bool_field(ini, DEFAULT_SECTION, "submitted"),
        confirmed: bool_field(ini, DEFAULT_SECTION, "confirmed"),
        ftp_dem: bool_field(ini, DEFAULT_SECTION, "ftp_dem"),
        ftp_dem_confirmed: bool_field(ini, DEFAULT_SECTION, "ftp_dem_confirmed"),
        bandratio: bool_field(ini, DEFAULT_SECTION, "bandratio"),
        bandratio_set: bool_field(ini, DEFAULT_SECTION, "bandratio_set"),
        bandratio_mapped_set: bool_field(ini, DEFAULT_SECTION, "bandratio_mapped_set"),
        restart: bool_field(ini, DEFAULT_SECTION, "restart"),
        has_error: bool_field(ini, DEFAULT_SECTION, "has_error"),
        status_email_sent: bool_field(ini, DEFAULT_SECTION, "status_email_sent"),
    };

    let mut equations = std::collections::BTreeMap::new();
    if let Some(defaults) = ini.section(DEFAULT_SECTION) {
        for (key, value) in defaults.iter() {
            if let Some(name) = key.strip_prefix("eq_") {
                equations.insert(name.to_string(), value.to_string());
            }
        }
    }

    let mut lines = std::collections::BTreeMap::new();
    for (section_name, properties) in ini.iter() {
        let Some(section_name) = section_name else { continue };
        if section_name.is_empty() {
            continue;
        }
        let Ok(line_key) = LineKey::parse(section_name) else { continue };

        let process = properties.get("process").map(|v| v.eq_ignore_ascii_case("true")).unwrap_or(false);
        let masking = section_value_or_default(ini, section_name, "masking").unwrap_or("none").to_string();
        let band_range = BandRange::parse(properties.get("bandlist").unwrap_or("ALL"))?;
        let line_sortie = properties.get("sortie").filter(|s| !s.is_empty()).map(str::to_string);

        let mut selectors = std::collections::BTreeMap::new();
        for (key, value) in properties.iter() {
            if key.starts_with("eq_") || key.starts_with("plugin_") {
                selectors.insert(key.to_string(), value.eq_ignore_ascii_case("true"));
            }
        }

        lines.insert(
            line_key,
            LineRecord { process, masking, band_range, sortie: line_sortie, selectors },
        );
    }

    let _ = path;
    Ok(Order {
        id,
        project_code,
        year,
        julian_day,
        sortie,
        projection,
        source_folder,
        output_folder,
        dem_source,
        dem_name,
        email,
        pixel_size: (pixel_x, pixel_y),
        interpolation,
        aplmap_ignore_freespace,
        declared_filesize_gb,
        flags,
        equations,
        lines,
    })
}

pub struct IniOrderRepository;

impl IniOrderRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IniOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl scops_domain::repositories::OrderRepository for IniOrderRepository {
    async fn list_order_files(&self, order_dir: &Path) -> Result<Vec<PathBuf>, ScopsError> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(order_dir).await.map_err(|e| ScopsError::IoError(e.to_string()))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| ScopsError::IoError(e.to_string()))? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("cfg") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    async fn load(&self, path: &Path) -> Result<Order, ScopsError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let ini = load_ini(&path)?;
            parse_order(&path, &ini)
        })
        .await
        .map_err(|e| ScopsError::InternalError(e.to_string()))?
    }

    async fn mark_submitted(&self, path: &Path) -> Result<(), ScopsError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let mut ini = load_ini(&path)?;
            ini.with_general_section_mut().set("submitted", "true");
            ini.write_to_file(&path).map_err(|e| ScopsError::IoError(e.to_string()))
        })
        .await
        .map_err(|e| ScopsError::InternalError(e.to_string()))?
    }

    async fn mark_status_email_sent(&self, path: &Path) -> Result<(), ScopsError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let mut ini = load_ini(&path)?;
            ini.with_general_section_mut().set("status_email_sent", "true");
            ini.write_to_file(&path).map_err(|e| ScopsError::IoError(e.to_string()))
        })
        .await
        .map_err(|e| ScopsError::InternalError(e.to_string()))?
    }
}
