/// Tests for the OWNERS include checker
/// Tests cover directive extraction, comment stripping, path resolution and line reporting

#[cfg(test)]
mod owners_checker_tests {
    use super::super::checker::{extract_include, normalize_lexically, OwnersIncludeChecker};
    use super::super::BrokenIncludeReport;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Lay out `files` (relative paths) under a fresh temp root
    fn tree(files: &[&str]) -> TempDir {
        let root = TempDir::new().unwrap();
        for file in files {
            let path = root.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "someone@example.com\n").unwrap();
        }
        root
    }

    // ==================== DIRECTIVE EXTRACTION ====================

    #[test]
    fn test_extract_include_directive() {
        assert_eq!(extract_include("include /build/OWNERS"), Some("/build/OWNERS"));
        assert_eq!(extract_include("include   ../OWNERS"), Some("../OWNERS"));
    }

    #[test]
    fn test_extract_file_directive() {
        assert_eq!(extract_include("file:/src/OWNERS"), Some("/src/OWNERS"));
        assert_eq!(extract_include("per-file *.rs = file: rust/OWNERS"), Some("rust/OWNERS"));
    }

    #[test]
    fn test_extract_ignores_non_directives() {
        let test_cases = vec![
            "",
            "someone@example.com",
            "*",
            "include",
            "include   ",
            "set noparent",
        ];

        for line in test_cases {
            assert_eq!(extract_include(line), None, "line: {:?}", line);
        }
    }

    #[test]
    fn test_extract_strips_comments() {
        assert_eq!(extract_include("include real/path # comment"), Some("real/path"));
        assert_eq!(extract_include("# include commented/OWNERS"), None);
        assert_eq!(extract_include("include#nothing"), None);
        assert_eq!(extract_include("file:a/OWNERS#b"), Some("a/OWNERS"));
    }

    // ==================== PATH RESOLUTION ====================

    #[test]
    fn test_rooted_path_resolves_against_root() {
        let checker = OwnersIncludeChecker::new("/work/fuchsia");
        assert_eq!(
            checker.resolve_include(Path::new("src/foo/OWNERS"), "/build/OWNERS"),
            PathBuf::from("/work/fuchsia/build/OWNERS")
        );
        assert_eq!(
            checker.resolve_include(Path::new("src/foo/OWNERS"), "//build/OWNERS"),
            PathBuf::from("/work/fuchsia/build/OWNERS")
        );
    }

    #[test]
    fn test_relative_path_resolves_against_owners_dir() {
        let checker = OwnersIncludeChecker::new("/work/fuchsia");
        assert_eq!(
            checker.resolve_include(Path::new("src/foo/OWNERS"), "../bar/OWNERS"),
            PathBuf::from("/work/fuchsia/src/bar/OWNERS")
        );
        assert_eq!(
            checker.resolve_include(Path::new("OWNERS"), "./tools/OWNERS"),
            PathBuf::from("/work/fuchsia/tools/OWNERS")
        );
    }

    #[test]
    fn test_absolute_owners_file_ignores_root() {
        let checker = OwnersIncludeChecker::new("/work/fuchsia");
        assert_eq!(
            checker.resolve_include(Path::new("/other/tree/OWNERS"), "sub/OWNERS"),
            PathBuf::from("/other/tree/sub/OWNERS")
        );
    }

    #[test]
    fn test_normalize_lexically() {
        let test_cases = vec![
            ("/a/b/../c", "/a/c"),
            ("/a/./b/", "/a/b"),
            ("/../a", "/a"),
            ("/a/b/../../..", "/"),
            ("../../x", "../../x"),
            ("a/../../x", "../x"),
            ("a/b/../../../../x", "../../x"),
            ("./a/../b", "b"),
        ];

        for (input, expected) in test_cases {
            assert_eq!(
                normalize_lexically(Path::new(input)),
                PathBuf::from(expected),
                "input: {}",
                input
            );
        }
    }

    #[test]
    fn test_relative_root_keeps_leading_parents() {
        let checker = OwnersIncludeChecker::new("../checkout");
        assert_eq!(
            checker.resolve_include(Path::new("OWNERS"), "../../shared/OWNERS"),
            PathBuf::from("../../shared/OWNERS")
        );
    }

    // ==================== LINE REPORTING ====================

    #[test]
    fn test_no_directives_reports_nothing() {
        let root = tree(&[]);
        let checker = OwnersIncludeChecker::new(root.path());
        let report = checker.check_contents(
            Path::new("OWNERS"),
            "alice@example.com\nbob@example.com\n*\n",
        );
        assert_eq!(report, BrokenIncludeReport::default());
    }

    #[test]
    fn test_missing_relative_include_is_reported() {
        let root = tree(&["src/OWNERS"]);
        let checker = OwnersIncludeChecker::new(root.path());
        let report = checker.check_contents(
            Path::new("src/OWNERS"),
            "alice@example.com\ninclude missing/path/OWNERS\n",
        );
        assert_eq!(report.lines, vec![2]);
    }

    #[test]
    fn test_existing_rooted_file_directive_is_clean() {
        let root = tree(&["existing/abs/OWNERS", "src/OWNERS"]);
        let checker = OwnersIncludeChecker::new(root.path());
        let report =
            checker.check_contents(Path::new("src/OWNERS"), "file:/existing/abs/OWNERS\n");
        assert!(report.is_clean());
    }

    #[test]
    fn test_comment_after_directive_is_ignored() {
        let root = tree(&["src/real/path", "src/OWNERS"]);
        let checker = OwnersIncludeChecker::new(root.path());
        let report = checker.check_contents(
            Path::new("src/OWNERS"),
            "include real/path # see also missing/OWNERS\n",
        );
        assert!(report.is_clean());
    }

    #[test]
    fn test_both_syntaxes_resolve_identically() {
        let root = tree(&["src/shared/OWNERS", "src/OWNERS"]);
        let checker = OwnersIncludeChecker::new(root.path());
        let report = checker.check_contents(
            Path::new("src/OWNERS"),
            "include shared/OWNERS\nfile:shared/OWNERS\ninclude gone/OWNERS\nfile: gone/OWNERS\n",
        );
        assert_eq!(report.lines, vec![3, 4]);
    }

    #[test]
    fn test_every_line_break_style_counts() {
        let root = tree(&["src/OWNERS"]);
        let checker = OwnersIncludeChecker::new(root.path());
        let test_cases = vec![
            ("a@example.com\ninclude gone/OWNERS\n", vec![2]),
            ("a@example.com\r\ninclude gone/OWNERS\r\n", vec![2]),
            ("a@example.com\rinclude gone/OWNERS\r", vec![2]),
            ("a@example.com\r\rinclude gone/OWNERS\ninclude gone/OWNERS", vec![3, 4]),
            ("a@example.com\r\n\rinclude gone/OWNERS", vec![3]),
        ];

        for (contents, expected) in test_cases {
            let report = checker.check_contents(Path::new("src/OWNERS"), contents);
            assert_eq!(report.lines, expected, "contents: {:?}", contents);
        }
    }

    #[test]
    fn test_check_file_reads_from_disk() {
        let root = tree(&["build/OWNERS", "src/lib/OWNERS"]);
        fs::write(
            root.path().join("src/lib/OWNERS"),
            "# Maintainers\ninclude /build/OWNERS\ninclude /nope/OWNERS\n\nfile:../../build/OWNERS\nfile:../OWNERS\n",
        )
        .unwrap();

        let checker = OwnersIncludeChecker::new(root.path());
        let report = checker.check_file(Path::new("src/lib/OWNERS")).unwrap();
        assert_eq!(report.lines, vec![3, 6]);
    }

    #[test]
    fn test_check_file_missing_input() {
        let root = tree(&[]);
        let checker = OwnersIncludeChecker::new(root.path());
        let err = checker.check_file(Path::new("no/such/OWNERS")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
