// Orchestrator: one parse, four emissions, per-target error capture.
// The emitter matching the source language runs too and doubles as a
// canonicalizer/self-check.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;

use anyhow::Result;
use serde::Serialize;

use emit::{CEmitter, CppEmitter, JavaEmitter, PythonEmitter};
use ir::Program;

/// Fixed in-band text for programs the class-less target cannot express.
pub const C_CLASS_SENTINEL: &str = "// C does not support classes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lang {
    Scripting,
    CFamily,
    CppFamily,
    ClassBased,
}

impl Lang {
    pub const ALL: [Lang; 4] = [Lang::Scripting, Lang::CFamily, Lang::CppFamily, Lang::ClassBased];

    pub fn tag(self) -> &'static str {
        match self {
            Lang::Scripting => "scripting",
            Lang::CFamily => "c-family",
            Lang::CppFamily => "cpp-family",
            Lang::ClassBased => "class-based",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Lang::Scripting => "Python",
            Lang::CFamily => "C",
            Lang::CppFamily => "C++",
            Lang::ClassBased => "Java",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Lang> {
        match tag {
            "scripting" | "python" | "py" => Some(Lang::Scripting),
            "c-family" | "c" => Some(Lang::CFamily),
            "cpp-family" | "cpp" | "c++" => Some(Lang::CppFamily),
            "class-based" | "java" => Some(Lang::ClassBased),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Lang> {
        match ext {
            "py" => Some(Lang::Scripting),
            "c" | "h" => Some(Lang::CFamily),
            "cpp" | "cc" | "cxx" | "hpp" => Some(Lang::CppFamily),
            "java" => Some(Lang::ClassBased),
            _ => None,
        }
    }

    /// Language identifier and version the host hands to the execution
    /// sandbox. The core itself never talks to it.
    pub fn sandbox_target(self) -> (&'static str, &'static str) {
        match self {
            Lang::Scripting => ("python", "3.10.0"),
            Lang::CFamily => ("c", "10.2.0"),
            Lang::CppFamily => ("c++", "10.2.0"),
            Lang::ClassBased => ("java", "15.0.2"),
        }
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lang::from_tag(s).ok_or_else(|| {
            format!("unknown language tag `{s}` (expected scripting, c-family, cpp-family, or class-based)")
        })
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Default, Serialize)]
pub struct TranspileResult {
    pub python: Option<String>,
    pub c: Option<String>,
    pub cpp: Option<String>,
    pub java: Option<String>,
    pub success: bool,
    pub errors: Vec<String>,
}

impl TranspileResult {
    pub fn get(&self, lang: Lang) -> Option<&str> {
        match lang {
            Lang::Scripting => self.python.as_deref(),
            Lang::CFamily => self.c.as_deref(),
            Lang::CppFamily => self.cpp.as_deref(),
            Lang::ClassBased => self.java.as_deref(),
        }
    }

    fn set(&mut self, lang: Lang, text: String) {
        match lang {
            Lang::Scripting => self.python = Some(text),
            Lang::CFamily => self.c = Some(text),
            Lang::CppFamily => self.cpp = Some(text),
            Lang::ClassBased => self.java = Some(text),
        }
    }
}

/// Front-end dispatch. Parsers are error-tolerant and always hand back a
/// program.
pub fn parse_source(source: &str, lang: Lang) -> Program {
    match lang {
        Lang::Scripting => parse::parse_python(source),
        Lang::CFamily => parse::parse_c(source),
        Lang::CppFamily => parse::parse_cpp(source),
        Lang::ClassBased => parse::parse_java(source),
    }
}

/// Holds the four emitters and reuses them across calls; their internal
/// counters reset at the start of each emission. Not Sync: concurrent
/// callers need their own instance.
#[derive(Default)]
pub struct Transpiler {
    python: PythonEmitter,
    c: CEmitter,
    cpp: CppEmitter,
    java: JavaEmitter,
}

impl Transpiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transpile(&mut self, source: &str, lang: Lang) -> TranspileResult {
        let prog = parse_source(source, lang);
        let has_classes = prog.has_nontrivial_class();
        log::debug!(
            "transpiling {} source: {} top-level nodes, nontrivial classes: {}",
            lang.display_name(),
            prog.body.len(),
            has_classes
        );

        let mut result = TranspileResult::default();
        let mut errors = Vec::new();
        for target in Lang::ALL {
            if target == Lang::CFamily && has_classes {
                result.set(target, C_CLASS_SENTINEL.to_string());
                continue;
            }
            let outcome = match target {
                Lang::Scripting => guarded(|| self.python.emit(&prog)),
                Lang::CFamily => guarded(|| self.c.emit(&prog)),
                Lang::CppFamily => guarded(|| self.cpp.emit(&prog)),
                Lang::ClassBased => guarded(|| self.java.emit(&prog)),
            };
            match outcome {
                Ok(text) => result.set(target, text),
                Err(message) => {
                    log::warn!("{} emission failed: {message}", target.display_name());
                    errors.push(format!("{} generation error: {message}", target.display_name()));
                }
            }
        }
        result.success = errors.is_empty();
        result.errors = errors;
        result
    }
}

/// One target's failure, including a panic, must not take down the
/// others.
fn guarded(emit: impl FnOnce() -> Result<String>) -> Result<String, String> {
    match catch_unwind(AssertUnwindSafe(emit)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(format!("{e:#}")),
        Err(_) => Err("emitter panicked".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for lang in Lang::ALL {
            assert_eq!(Lang::from_tag(lang.tag()), Some(lang));
        }
        assert_eq!(Lang::from_tag("nope"), None);
    }

    #[test]
    fn sandbox_mapping_is_fixed() {
        assert_eq!(Lang::Scripting.sandbox_target(), ("python", "3.10.0"));
        assert_eq!(Lang::ClassBased.sandbox_target(), ("java", "15.0.2"));
    }

    #[test]
    fn all_four_outputs_on_success() {
        let mut t = Transpiler::new();
        let r = t.transpile("x = 1\n", Lang::Scripting);
        assert!(r.success);
        assert!(r.errors.is_empty());
        for lang in Lang::ALL {
            assert!(r.get(lang).is_some(), "missing output for {lang}");
        }
    }
}
