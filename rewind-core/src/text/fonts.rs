use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    foundation::error::{RewindError, RewindResult},
    text::layout::probe_family_name,
    text::script::ScriptClass,
};

/// Bundled regular face, relative to the asset root.
pub const BUNDLED_REGULAR_FONT: &str = "public/fonts/Outfit-Regular.ttf";
/// Bundled bold face, relative to the asset root.
pub const BUNDLED_BOLD_FONT: &str = "public/fonts/Outfit-Bold.ttf";
/// System face used when a bundled face is missing.
pub const SYSTEM_FALLBACK_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";
/// Right-to-left script face (regular).
pub const ARABIC_REGULAR_FONT: &str = "/usr/share/fonts/noto/NotoSansArabic-Regular.ttf";
/// Right-to-left script face (bold).
pub const ARABIC_BOLD_FONT: &str = "/usr/share/fonts/noto/NotoSansArabic-Bold.ttf";

/// Requested font weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// Normal weight.
    Regular,
    /// Bold weight.
    Bold,
}

impl FontWeight {
    fn slot(self) -> usize {
        match self {
            Self::Regular => 0,
            Self::Bold => 1,
        }
    }
}

/// Where a loaded face came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// A font file shipped under the asset root.
    Bundled(PathBuf),
    /// A font file at a fixed system path.
    System(PathBuf),
    /// The default sans-serif face of the system font database.
    Database {
        /// Family name reported by the database.
        family: String,
    },
    /// Raw bytes handed in by the caller.
    Memory,
}

impl FontSource {
    fn path(&self) -> Option<&Path> {
        match self {
            Self::Bundled(p) | Self::System(p) => Some(p.as_path()),
            Self::Database { .. } | Self::Memory => None,
        }
    }
}

/// Font file locations consulted by [`FontBook::load`].
#[derive(Clone, Debug)]
pub struct FontOpts {
    /// Preferred regular face, relative to the asset root.
    pub bundled_regular: PathBuf,
    /// Preferred bold face, relative to the asset root.
    pub bundled_bold: PathBuf,
    /// Absolute fallback used for both weights when a bundled face is unusable.
    pub system_fallback: PathBuf,
    /// Regular face for Arabic-range text.
    pub arabic_regular: PathBuf,
    /// Bold face for Arabic-range text.
    pub arabic_bold: PathBuf,
    /// Query the system font database as the last resort.
    pub use_system_database: bool,
}

impl Default for FontOpts {
    fn default() -> Self {
        Self {
            bundled_regular: PathBuf::from(BUNDLED_REGULAR_FONT),
            bundled_bold: PathBuf::from(BUNDLED_BOLD_FONT),
            system_fallback: PathBuf::from(SYSTEM_FALLBACK_FONT),
            arabic_regular: PathBuf::from(ARABIC_REGULAR_FONT),
            arabic_bold: PathBuf::from(ARABIC_BOLD_FONT),
            use_system_database: true,
        }
    }
}

impl FontOpts {
    /// Defaults with `REWIND_SYSTEM_FONT`, `REWIND_ARABIC_FONT` and `REWIND_ARABIC_BOLD_FONT`
    /// overrides applied.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(p) = env_path("REWIND_SYSTEM_FONT") {
            opts.system_fallback = p;
        }
        if let Some(p) = env_path("REWIND_ARABIC_FONT") {
            opts.arabic_regular = p;
        }
        if let Some(p) = env_path("REWIND_ARABIC_BOLD_FONT") {
            opts.arabic_bold = p;
        }
        opts
    }

    fn bundled(&self, weight: FontWeight) -> &Path {
        match weight {
            FontWeight::Regular => &self.bundled_regular,
            FontWeight::Bold => &self.bundled_bold,
        }
    }

    fn arabic(&self, weight: FontWeight) -> &Path {
        match weight {
            FontWeight::Regular => &self.arabic_regular,
            FontWeight::Bold => &self.arabic_bold,
        }
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Stable index of a face inside a [`FontBook`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub(crate) u16);

/// A loaded font face: raw bytes plus provenance.
#[derive(Clone)]
pub struct FontFace {
    /// Where the bytes were loaded from.
    pub source: FontSource,
    /// Script the face was selected for.
    pub script: ScriptClass,
    /// Weight the face was selected for.
    pub weight: FontWeight,
    pub(crate) bytes: Arc<Vec<u8>>,
    pub(crate) index: u32,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("source", &self.source)
            .field("script", &self.script)
            .field("weight", &self.weight)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontFace {
    /// Wrap font bytes that were obtained elsewhere.
    pub fn from_bytes(bytes: Vec<u8>, script: ScriptClass, weight: FontWeight) -> Self {
        Self {
            source: FontSource::Memory,
            script,
            weight,
            bytes: Arc::new(bytes),
            index: 0,
        }
    }

    /// Raw font file bytes.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }
}

/// Resolved set of faces for the default and right-to-left scripts, in both weights.
///
/// Resolution order for the default script is bundled file, fixed system path, then the system
/// font database. The Arabic faces fall back to the default face of the same weight.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: Vec<FontFace>,
    default: [Option<FaceId>; 2],
    arabic: [Option<FaceId>; 2],
}

impl FontBook {
    /// A book without any faces; every text lookup yields `None`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve all faces, never failing: unusable candidates are logged and skipped.
    #[tracing::instrument(skip(opts))]
    pub fn load(root: &Path, opts: &FontOpts) -> Self {
        let mut book = Self::default();
        let mut system_db: Option<usvg::fontdb::Database> = None;

        for weight in [FontWeight::Regular, FontWeight::Bold] {
            let bundled = root.join(opts.bundled(weight));
            let mut id = None;
            if bundled.is_file() {
                id = book.load_file_logged(FontSource::Bundled(bundled), ScriptClass::Default, weight);
            }
            if id.is_none() {
                id = book.load_file_logged(
                    FontSource::System(opts.system_fallback.clone()),
                    ScriptClass::Default,
                    weight,
                );
            }
            if id.is_none() && opts.use_system_database {
                let db = system_db.get_or_insert_with(|| {
                    let mut db = usvg::fontdb::Database::new();
                    db.load_system_fonts();
                    db
                });
                match face_from_database(db, weight) {
                    Ok(face) => id = Some(book.insert(face)),
                    Err(e) => tracing::warn!("no system font for {weight:?}: {e}"),
                }
            }
            if id.is_none() {
                tracing::warn!("no usable {weight:?} font; text in this weight will be skipped");
            }
            book.default[weight.slot()] = id;

            let arabic = opts.arabic(weight);
            if arabic.is_file() {
                book.arabic[weight.slot()] = book.load_file_logged(
                    FontSource::System(arabic.to_path_buf()),
                    ScriptClass::Arabic,
                    weight,
                );
            } else {
                tracing::debug!(
                    "arabic font '{}' not found; using default face",
                    arabic.display()
                );
            }
        }

        book
    }

    /// Add a face and return its id. Does not assign it to any role.
    pub fn insert(&mut self, face: FontFace) -> FaceId {
        let id = FaceId(self.faces.len() as u16);
        self.faces.push(face);
        id
    }

    /// Use `id` as the default-script face for `weight`.
    pub fn set_default(&mut self, weight: FontWeight, id: FaceId) {
        self.default[weight.slot()] = Some(id);
    }

    /// Use `id` as the Arabic-script face for `weight`.
    pub fn set_arabic(&mut self, weight: FontWeight, id: FaceId) {
        self.arabic[weight.slot()] = Some(id);
    }

    /// Lookup a face by id.
    pub fn get(&self, id: FaceId) -> RewindResult<&FontFace> {
        self.faces
            .get(usize::from(id.0))
            .ok_or_else(|| RewindError::font(format!("unknown FaceId {}", id.0)))
    }

    /// Default-script face for `weight`.
    pub fn default_face(&self, weight: FontWeight) -> Option<FaceId> {
        self.default[weight.slot()]
    }

    /// Script-aware selection: the Arabic face when `text` contains Arabic-range code points and
    /// one is loaded, the default face otherwise.
    pub fn face_for(&self, text: &str, weight: FontWeight) -> Option<FaceId> {
        match ScriptClass::of(text) {
            ScriptClass::Arabic => self.arabic[weight.slot()].or(self.default_face(weight)),
            ScriptClass::Default => self.default_face(weight),
        }
    }

    /// Number of distinct faces held.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Return `true` when no face could be loaded.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn load_file_logged(
        &mut self,
        source: FontSource,
        script: ScriptClass,
        weight: FontWeight,
    ) -> Option<FaceId> {
        let path = source.path().map(Path::to_path_buf);
        if let Some(p) = path.as_deref()
            && let Some(i) = self.faces.iter().position(|f| f.source.path() == Some(p))
        {
            return Some(FaceId(i as u16));
        }

        match load_face_file(source, script, weight) {
            Ok(face) => {
                tracing::debug!(source = ?face.source, "loaded font face");
                Some(self.insert(face))
            }
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        }
    }
}

fn load_face_file(
    source: FontSource,
    script: ScriptClass,
    weight: FontWeight,
) -> RewindResult<FontFace> {
    let path = source
        .path()
        .ok_or_else(|| RewindError::font("font source has no file path"))?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("read font '{}'", path.display()))
        .map_err(|e| RewindError::font(format!("{e:#}")))?;
    if probe_family_name(&bytes).is_none() {
        return Err(RewindError::font(format!(
            "'{}' is not a usable font file",
            path.display()
        )));
    }

    Ok(FontFace {
        source,
        script,
        weight,
        bytes: Arc::new(bytes),
        index: 0,
    })
}

fn face_from_database(
    db: &usvg::fontdb::Database,
    weight: FontWeight,
) -> RewindResult<FontFace> {
    let families = [usvg::fontdb::Family::SansSerif];
    let query = usvg::fontdb::Query {
        families: &families,
        weight: match weight {
            FontWeight::Regular => usvg::fontdb::Weight::NORMAL,
            FontWeight::Bold => usvg::fontdb::Weight::BOLD,
        },
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };

    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))
        .ok_or_else(|| RewindError::font("system font database is empty"))?;
    let family = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "sans-serif".to_string());
    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| RewindError::font(format!("cannot read face data for '{family}'")))?;

    Ok(FontFace {
        source: FontSource::Database { family },
        script: ScriptClass::Default,
        weight,
        bytes: Arc::new(bytes),
        index,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
