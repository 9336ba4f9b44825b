//! Extension and language lookup tables

use containerizer_core::Language;

/// Display names used when the tech stack crosses the request boundary
const DISPLAY_NAMES: &[(&str, &str)] = &[
    (".py", "Python"),
    (".js", "JavaScript"),
    (".ts", "TypeScript"),
    (".json", "JSON"),
    (".java", "Java"),
    (".c", "C"),
    (".cpp", "C++"),
    (".cs", "C#"),
    (".go", "Go"),
    (".rb", "Ruby"),
    (".php", "PHP"),
    (".rs", "Rust"),
    (".sh", "Shell"),
    (".html", "HTML"),
    (".css", "CSS"),
];

/// Fallback language table, in tie-breaking order
const FALLBACK_LANGUAGES: &[(&str, Language)] = &[
    (".js", Language::JavaScriptTypeScript),
    (".ts", Language::JavaScriptTypeScript),
    (".jsx", Language::JavaScriptTypeScript),
    (".tsx", Language::JavaScriptTypeScript),
    (".py", Language::Python),
    (".java", Language::Java),
    (".cs", Language::CSharp),
    (".go", Language::Go),
    (".rs", Language::Rust),
    (".php", Language::Php),
    (".rb", Language::Ruby),
    (".html", Language::Web),
    (".css", Language::Web),
    (".cpp", Language::CCpp),
    (".c", Language::CCpp),
    (".swift", Language::Swift),
    (".kt", Language::Kotlin),
];

/// Lowercase extension of a file name including the dot (`Main.JS` -> `.js`)
///
/// Dotfiles such as `.env` have no extension.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

/// Human-readable name for a tech-stack extension, or the extension itself
pub fn display_name(extension: &str) -> &str {
    DISPLAY_NAMES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, name)| *name)
        .unwrap_or(extension)
}

/// Language implied by an extension in the fallback table, with its rank
pub fn fallback_language(extension: &str) -> Option<(usize, Language)> {
    FALLBACK_LANGUAGES
        .iter()
        .position(|(ext, _)| *ext == extension)
        .map(|rank| (rank, FALLBACK_LANGUAGES[rank].1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_lowercased_with_dot() {
        assert_eq!(extension_of("index.JS").as_deref(), Some(".js"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(extension_of(".env"), None);
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn display_names_fall_back_to_extension() {
        assert_eq!(display_name(".rs"), "Rust");
        assert_eq!(display_name(".zig"), ".zig");
    }

    #[test]
    fn fallback_ranks_follow_table_order() {
        let (js_rank, js) = fallback_language(".js").unwrap();
        let (py_rank, py) = fallback_language(".py").unwrap();
        assert_eq!(js, Language::JavaScriptTypeScript);
        assert_eq!(py, Language::Python);
        assert!(js_rank < py_rank);
        assert!(fallback_language(".sh").is_none());
    }
}
