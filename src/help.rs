//! Help, `docs` and `info` text

pub const EXAMPLES: &str = "\
Examples:
  $ snapcat tree                            # Tree of current directory
  $ snapcat tree src --format md            # Tree in markdown format
  $ snapcat tree --depth 2 --no-recursive   # Non-recursive with depth limit
  $ snapcat tree --debug --verbose          # Debug mode with verbose output
  $ snapcat cat \"*.ts\" \"*.json\"             # Cat TypeScript and JSON files
  $ snapcat cat README.md --preview         # Preview file contents
  $ snapcat cat \"src/**/*.ts\" --max-size 100K

Tip: Use 'snapcat <command> --help' for detailed command usage";

pub const TREE_EXAMPLES: &str = "\
Examples:
  $ snapcat tree /path/to/project       # Specific directory tree
  $ snapcat tree --format md            # Markdown output
  $ snapcat tree --no-recursive         # Current directory only
  $ snapcat tree --depth 3              # Limit recursion depth to 3
  $ snapcat tree --output tree.json     # Save to file
  $ snapcat tree --ignore '*.log' tmp   # Ignore log files and tmp
  $ snapcat tree --max-size 1M --preview

Directories become nested objects; files carry size, SHA-256, path,
permissions and timestamp metadata.";

pub const CAT_EXAMPLES: &str = "\
Examples:
  $ snapcat cat file1.txt file2.js          # Metadata for specific files
  $ snapcat cat \"src/**/*.js\"               # All JS files below src
  $ snapcat cat \"*.{json,md,txt}\"           # Several extensions at once
  $ snapcat cat \"*.md\" --output report.md --format md
  $ snapcat cat \"*.log\" --ignore error.log --verbose
  $ snapcat cat \"*.ts\" --timeout 30000      # Give up after 30s

Output is a path-sorted list of file records.";

/// Topics accepted by `snapcat docs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocTopic {
    Readme,
    License,
    Contributing,
    Tutorial,
}

impl DocTopic {
    pub const ALL: [DocTopic; 4] = [
        DocTopic::Readme,
        DocTopic::License,
        DocTopic::Contributing,
        DocTopic::Tutorial,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|topic| topic.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Readme => "readme",
            Self::License => "license",
            Self::Contributing => "contributing",
            Self::Tutorial => "tutorial",
        }
    }

    fn summary(self) -> &'static str {
        match self {
            Self::Readme => "Project overview and features",
            Self::License => "MIT License details",
            Self::Contributing => "How to contribute",
            Self::Tutorial => "Step-by-step usage tutorial",
        }
    }

    fn body(self) -> &'static str {
        match self {
            Self::Readme => README,
            Self::License => LICENSE,
            Self::Contributing => CONTRIBUTING,
            Self::Tutorial => TUTORIAL,
        }
    }
}

/// Text for `snapcat docs [topic]`: the topic body, or the topic list when
/// the topic is missing or unknown.
pub fn docs_text(topic: Option<&str>) -> String {
    match topic.and_then(DocTopic::parse) {
        Some(topic) => format!("{}\n\n{}", topic.name().to_uppercase(), topic.body()),
        None => {
            let mut out = String::from("Available documentation topics:\n");
            for topic in DocTopic::ALL {
                out.push_str(&format!("  {:<13} - {}\n", topic.name(), topic.summary()));
            }
            out.push_str("\nUsage: snapcat docs <topic>");
            out
        }
    }
}

pub fn info_text() -> String {
    format!(
        "\
snapcat - fast tree & cat snapshots for text files
Version: {}

Features:
  Recursive directory snapshots with depth limits
  Ignore patterns from built-ins, .gitignore, .snapcatignore and --ignore
  JSON and Markdown output
  SHA-256 content hashes, sizes, permissions and timestamps
  Glob patterns with ** and {{a,b}} alternation
  Optional content preview for text files
  Per-run metadata caching

Quick Start:
  $ snapcat tree --help
  $ snapcat cat --help
  $ snapcat docs tutorial",
        env!("CARGO_PKG_VERSION")
    )
}

const README: &str = "\
snapcat takes snapshots of files: either a directory tree (`snapcat tree`)
or a set of glob matches (`snapcat cat`). Each file is described by its
paths, size, SHA-256 hash, permissions and modification time, and can
optionally include a preview of its text content.

Entries matching ignore patterns are skipped. Patterns come from a built-in
list (node_modules, .git, dist, build, *.log, ...), from .gitignore and
.snapcatignore in the root being scanned, and from --ignore.

Output is JSON by default, or Markdown with --format md.";

const LICENSE: &str = "\
MIT License

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.";

const CONTRIBUTING: &str = "\
Contributions are welcome.

1. Fork the repository and create a branch for your change.
2. Run `cargo fmt`, `cargo clippy` and `cargo test` before pushing.
3. Add tests next to the code you change (unit tests in the module,
   CLI behaviour in tests/).
4. Open a pull request describing what changed and why.";

const TUTORIAL: &str = "\
1. Snapshot the current directory as JSON:
     $ snapcat tree

2. Limit the walk to two levels and write Markdown to a file:
     $ snapcat tree --depth 2 --format md --output tree.md

3. Skip extra paths on top of the defaults:
     $ snapcat tree --ignore '*.png' fixtures/

4. Collect specific files, with content previews:
     $ snapcat cat \"src/**/*.rs\" Cargo.toml --preview

5. Keep previews small and bound the run time:
     $ snapcat cat \"**/*.md\" --preview --max-size 100K --timeout 30s

6. See what happened:
     $ snapcat tree --verbose      # summary and cache statistics
     $ snapcat tree --debug        # per-entry logging, cache disabled";
