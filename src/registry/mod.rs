use crate::extract::Extractor;

/// A workload program the shell can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    pub name: &'static str,
    /// File to run when it is not `wasm_<name>.js`.
    pub program: Option<&'static str>,
    pub extractor: Extractor,
    /// Some line of a default-size run must start with a match of this.
    pub expected: Option<&'static str>,
}

impl Workload {
    const fn standard(name: &'static str, expected: &'static str) -> Self {
        Workload {
            name,
            program: None,
            extractor: Extractor::Standard,
            expected: Some(expected),
        }
    }

    const fn with_program(mut self, program: &'static str) -> Self {
        self.program = Some(program);
        self
    }

    pub fn program_file(&self) -> String {
        match self.program {
            Some(program) => program.to_string(),
            None => format!("wasm_{}.js", self.name),
        }
    }
}

pub const WORKLOADS: &[Workload] = &[
    Workload::standard("box2d", r"frame averages:.*, range:.* to "),
    Workload::standard("bullet", r"ok.*"),
    Workload::standard("conditionals", r"ok 144690090"),
    Workload::standard("copy", r"sum:2836"),
    Workload::standard("corrections", r"final: 40006013:10225."),
    Workload::standard("fannkuch", r"4312567891011"),
    Workload::standard("fasta", r"CCACTGCACTCCAGCCTGGGCGACAGAGCGAGACTCCGTCTCAAAAAGGCCGGGCGCGGT"),
    Workload::standard("ifs", r"ok"),
    Workload {
        name: "linpack",
        program: Some("wasm_linpack_float.c.js"),
        extractor: Extractor::Linpack,
        expected: None,
    },
    Workload::standard("binarytrees", "843\t trees of depth 10\t check: -842")
        .with_program("wasm_lua_binarytrees.c.js"),
    Workload {
        name: "scimark",
        program: Some("wasm_lua_scimark.c.js"),
        extractor: Extractor::SciMark,
        expected: None,
    },
    Workload::standard("memops", r"final: 400."),
    Workload::standard("primes", r"lastprime: 3043739."),
    Workload::standard("raybench", r"Render time: .*").with_program("raybench.js"),
    Workload::standard("skinning", r"blah=0.000000"),
    Workload::standard("zlib", r"sizes: 100000,25906").with_program("wasm_zlib.c.js"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashSet;

    fn find(name: &str) -> Option<&'static Workload> {
        WORKLOADS.iter().find(|w| w.name == name)
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = WORKLOADS.iter().map(|w| w.name).collect();
        assert_eq!(names.len(), WORKLOADS.len());
    }

    #[test]
    fn test_program_files() {
        assert_eq!(find("box2d").unwrap().program_file(), "wasm_box2d.js");
        assert_eq!(find("raybench").unwrap().program_file(), "raybench.js");
        assert_eq!(find("linpack").unwrap().program_file(), "wasm_linpack_float.c.js");
        assert_eq!(
            find("binarytrees").unwrap().program_file(),
            "wasm_lua_binarytrees.c.js"
        );
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_expected_patterns_compile() {
        for workload in WORKLOADS {
            if let Some(pattern) = workload.expected {
                assert!(Regex::new(pattern).is_ok(), "{}", workload.name);
            }
        }
    }

    #[test]
    fn test_score_workloads_have_no_pattern() {
        assert_eq!(find("linpack").unwrap().extractor, Extractor::Linpack);
        assert_eq!(find("scimark").unwrap().extractor, Extractor::SciMark);
        assert!(find("scimark").unwrap().expected.is_none());
    }

    #[test]
    fn test_box_prefix_selects_one() {
        let re = Regex::new("^box").unwrap();
        let hits: Vec<_> = WORKLOADS
            .iter()
            .filter(|w| re.is_match(w.name))
            .map(|w| w.name)
            .collect();
        assert_eq!(hits, vec!["box2d"]);
    }
}
