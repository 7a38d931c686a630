/// File categorization by extension.
///
/// Each [`Category`] owns a destination directory and a fixed set of
/// extensions. [`FileMapper`] resolves an extension to its category, checking
/// categories in priority order: images, video, documents, audio, archives.
/// Anything unmatched is [`Category::Other`].
///
/// # Examples
///
/// ```
/// use sortdir::file_category::{Category, FileMapper};
///
/// let mapper = FileMapper::default();
/// assert_eq!(mapper.categorize("JPG"), Category::Image);
/// assert_eq!(mapper.categorize("gz"), Category::Archive);
/// assert_eq!(mapper.categorize("xyz"), Category::Other);
/// ```
use serde::Serialize;
use std::collections::HashMap;

/// Represents a file category and its destination directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Image files (JPEG, PNG, SVG)
    Image,
    /// Video files (AVI, MP4, MOV, MKV)
    Video,
    /// Document files (DOC, DOCX, TXT, PDF, XLSX, PPTX)
    Document,
    /// Audio files (MP3, OGG, WAV, AMR)
    Audio,
    /// Archive files (ZIP, GZ, TAR)
    Archive,
    /// Unknown or uncategorized files
    Other,
}

impl Category {
    /// All categories, in lookup priority order.
    pub const ALL: [Category; 6] = [
        Category::Image,
        Category::Video,
        Category::Document,
        Category::Audio,
        Category::Archive,
        Category::Other,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortdir::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "images");
    /// assert_eq!(Category::Video.dir_name(), "video");
    /// assert_eq!(Category::Other.dir_name(), "others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "images",
            Category::Video => "video",
            Category::Document => "documents",
            Category::Audio => "audio",
            Category::Archive => "archives",
            Category::Other => "others",
        }
    }

    /// Returns the heading used for this category in the summary.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Image => "Images",
            Category::Video => "Video",
            Category::Document => "Documents",
            Category::Audio => "Audio",
            Category::Archive => "Archives",
            Category::Other => "Others",
        }
    }

    /// Extensions recognized for this category out of the box.
    pub fn default_extensions(&self) -> &'static [&'static str] {
        match self {
            Category::Image => &["jpeg", "png", "jpg", "svg"],
            Category::Video => &["avi", "mp4", "mov", "mkv"],
            Category::Document => &["doc", "docx", "txt", "pdf", "xlsx", "pptx"],
            Category::Audio => &["mp3", "ogg", "wav", "amr"],
            Category::Archive => &["zip", "gz", "tar"],
            Category::Other => &[],
        }
    }

    /// Returns true if `name` is one of the reserved destination directory names.
    pub fn is_reserved_dir_name(name: &str) -> bool {
        Self::ALL.iter().any(|category| category.dir_name() == name)
    }
}

/// Returns the lowercased text after the last `.` of a file name.
///
/// A name without any `.` is its own extension, so `README` yields `readme`.
///
/// ```
/// use sortdir::file_category::extension_of;
///
/// assert_eq!(extension_of("backup.TAR.GZ"), "gz");
/// assert_eq!(extension_of("README"), "readme");
/// ```
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_lowercase()
}

/// Maps file extensions to categories.
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<String, Category>,
}

impl FileMapper {
    /// Creates a new `FileMapper` with the standard extension tables.
    pub fn new() -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        mapper.populate_standard_mappings();
        mapper
    }

    fn populate_standard_mappings(&mut self) {
        for category in Category::ALL {
            for ext in category.default_extensions() {
                self.add_extension_mapping(ext, category);
            }
        }
    }

    /// Adds a file extension to category mapping.
    ///
    /// An extension that is already mapped keeps its first category, which
    /// preserves the lookup priority of the standard tables. Returns false
    /// when the mapping was ignored for that reason.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) -> bool {
        let key = ext.trim_start_matches('.').to_lowercase();
        if self.extension_map.contains_key(&key) {
            return false;
        }
        self.extension_map.insert(key, category);
        true
    }

    /// Maps a file extension to a category, if it is recognized.
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }

    /// Determines the category for an extension, defaulting to `Other`.
    pub fn categorize(&self, ext: &str) -> Category {
        self.extension_to_category(ext).unwrap_or(Category::Other)
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Image.dir_name(), "images");
        assert_eq!(Category::Video.dir_name(), "video");
        assert_eq!(Category::Document.dir_name(), "documents");
        assert_eq!(Category::Audio.dir_name(), "audio");
        assert_eq!(Category::Archive.dir_name(), "archives");
        assert_eq!(Category::Other.dir_name(), "others");
    }

    #[test]
    fn test_reserved_dir_names() {
        for category in Category::ALL {
            assert!(Category::is_reserved_dir_name(category.dir_name()));
        }
        assert!(!Category::is_reserved_dir_name("Images"));
        assert!(!Category::is_reserved_dir_name("videos"));
        assert!(!Category::is_reserved_dir_name("2023"));
    }

    #[test]
    fn test_standard_tables() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize("svg"), Category::Image);
        assert_eq!(mapper.categorize("mkv"), Category::Video);
        assert_eq!(mapper.categorize("xlsx"), Category::Document);
        assert_eq!(mapper.categorize("amr"), Category::Audio);
        assert_eq!(mapper.categorize("tar"), Category::Archive);
    }

    #[test]
    fn test_categorize_case_insensitive() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize("PDF"), Category::Document);
        assert_eq!(mapper.categorize("Mp3"), Category::Audio);
    }

    #[test]
    fn test_categorize_defaults_to_other() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize("xyz"), Category::Other);
        assert_eq!(mapper.categorize(""), Category::Other);
        assert_eq!(mapper.extension_to_category("gif"), None);
    }

    #[test]
    fn test_extra_mapping() {
        let mut mapper = FileMapper::default();
        assert!(mapper.add_extension_mapping(".WEBP", Category::Image));
        assert_eq!(mapper.categorize("webp"), Category::Image);
    }

    #[test]
    fn test_first_mapping_wins() {
        let mut mapper = FileMapper::default();
        assert!(!mapper.add_extension_mapping("txt", Category::Archive));
        assert_eq!(mapper.categorize("txt"), Category::Document);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), "jpg");
        assert_eq!(extension_of("a.b.c"), "c");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of("noext"), "noext");
    }
}
