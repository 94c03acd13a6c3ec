//! Comment syntax of the host files carried in a snapshot.
//!
//! Header lines are wrapped in the comment syntax of the file they introduce,
//! so `a/b.c` gets `// === a/b.c ===` while `Makefile` gets `# === Makefile ===`.

/// A comment syntax used to wrap header lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentStyle {
    /// `// ...` (C family, Swift, Java, Kotlin, JS, Rust, PHP)
    Slash,
    /// `# ...` (shell, Python, Ruby, Perl, CMake, Makefiles, config files)
    Hash,
    /// `/* ... */` (CSS)
    Block,
    /// `<!-- ... -->` (XML, HTML, plists)
    Xml,
    /// `-- ...` (SQL, Lua, Haskell)
    DashDash,
    /// `; ...` (assembly, Lisp, ini files)
    Semicolon,
    /// `% ...` (TeX, Erlang, MATLAB)
    Percent,
    /// A header line with no comment wrapper.
    Bare,
}

/// Extension table; first match wins.
const EXTENSION_STYLES: &[(&[&str], CommentStyle)] = &[
    (
        &[
            "c", "h", "cc", "cpp", "cxx", "hpp", "hh", "hxx", "inc", "def", "m", "mm", "swift",
            "java", "kt", "kts", "js", "mjs", "ts", "tsx", "jsx", "rs", "go", "php", "phpt",
            "cs", "scala", "dart", "d", "y", "l", "gyb", "modulemap", "proto", "td", "sil",
            "cl", "metal", "defs", "exp", "exports", "strings",
        ],
        CommentStyle::Slash,
    ),
    (
        &[
            "py", "rb", "sh", "bash", "zsh", "pl", "pm", "cmake", "mk", "am", "ac", "in", "yml",
            "yaml", "toml", "cfg", "conf", "r", "tcl", "awk", "sed", "ps1", "nix", "gn", "gni",
            "bzl", "txt", "spec",
        ],
        CommentStyle::Hash,
    ),
    (&["css", "scss", "less"], CommentStyle::Block),
    (
        &[
            "xml", "html", "htm", "xhtml", "plist", "xib", "storyboard", "svg", "xsl", "xslt",
            "md", "entitlements",
        ],
        CommentStyle::Xml,
    ),
    (&["sql", "lua", "hs", "lhs", "ada", "adb", "ads", "elm"], CommentStyle::DashDash),
    (&["s", "asm", "lisp", "el", "clj", "scm", "ini", "ll"], CommentStyle::Semicolon),
    (&["tex", "sty", "erl", "hrl", "mat", "ps", "eps"], CommentStyle::Percent),
];

/// File names without a useful extension.
const NAME_STYLES: &[(&str, CommentStyle)] = &[
    ("makefile", CommentStyle::Hash),
    ("gnumakefile", CommentStyle::Hash),
    ("dockerfile", CommentStyle::Hash),
    ("cmakelists.txt", CommentStyle::Hash),
    ("gemfile", CommentStyle::Hash),
    ("podfile", CommentStyle::Hash),
    ("rakefile", CommentStyle::Hash),
    ("brewfile", CommentStyle::Hash),
    ("package.swift", CommentStyle::Slash),
];

impl CommentStyle {
    /// Chooses the host comment syntax for a repository-relative path.
    ///
    /// Unknown extensions fall back to `//`, the syntax of the bulk of
    /// sources found in snapshots.
    pub fn for_path(path: &str) -> CommentStyle {
        let name = path.rsplit('/').next().unwrap_or(path).to_ascii_lowercase();
        if let Some((_, style)) = NAME_STYLES.iter().find(|(n, _)| *n == name) {
            return *style;
        }
        if let Some((_, ext)) = name.rsplit_once('.') {
            for (exts, style) in EXTENSION_STYLES {
                if exts.contains(&ext) {
                    return *style;
                }
            }
        }
        CommentStyle::Slash
    }

    /// The token opening a comment in this style.
    pub fn opener(&self) -> Option<&'static str> {
        match self {
            CommentStyle::Slash => Some("//"),
            CommentStyle::Hash => Some("#"),
            CommentStyle::Block => Some("/*"),
            CommentStyle::Xml => Some("<!--"),
            CommentStyle::DashDash => Some("--"),
            CommentStyle::Semicolon => Some(";"),
            CommentStyle::Percent => Some("%"),
            CommentStyle::Bare => None,
        }
    }

    /// The token closing a comment, for styles that need one.
    pub fn closer(&self) -> Option<&'static str> {
        match self {
            CommentStyle::Block => Some("*/"),
            CommentStyle::Xml => Some("-->"),
            _ => None,
        }
    }

    /// Looks a style up by its opening token.
    pub fn from_opener(opener: &str) -> Option<CommentStyle> {
        match opener {
            "//" => Some(CommentStyle::Slash),
            "#" => Some(CommentStyle::Hash),
            "/*" => Some(CommentStyle::Block),
            "<!--" => Some(CommentStyle::Xml),
            "--" => Some(CommentStyle::DashDash),
            ";" => Some(CommentStyle::Semicolon),
            "%" => Some(CommentStyle::Percent),
            _ => None,
        }
    }
}
