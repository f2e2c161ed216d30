// Licensed under the Apache-2.0 license

//! Generate the register setting API of an HLS accelerator.
//!
//! Reads the IP descriptor, renders the header and the implementation, and
//! writes both only once both have been generated. With `check` set nothing
//! is written; the files on disk are compared instead.

use anyhow::{bail, Context, Result};
use hwacc_registers_descriptor::ParseConfig;
use hwacc_registers_generator::util::{file_name, header_path_for};
use hwacc_registers_generator::{generate_reg_api_from_file_with_config, NameConfig, OutputConfig};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Options of the `reg-api` command.
pub struct RegApiArgs<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub debug: bool,
    pub bus: &'a str,
    pub strip_prefixes: &'a [String],
    pub no_default_strip: bool,
    pub check: bool,
}

/// Generate (or check) the declarations and definitions files.
pub fn generate(args: &RegApiArgs) -> Result<()> {
    if !args.input.is_file() {
        bail!("Missing file {}.", args.input.display());
    }

    let mut parse_config = if args.no_default_strip {
        ParseConfig::none()
    } else {
        ParseConfig::with_defaults()
    };
    parse_config = parse_config.bus_kind(args.bus);
    for prefix in args.strip_prefixes {
        parse_config = parse_config.add_prefix(prefix);
    }

    let header_path = header_path_for(args.output);
    let output_config = OutputConfig::with_defaults()
        .header_name(&file_name(&header_path))
        .debug_trace(args.debug);

    println!("Generating register API from: {}", args.input.display());
    let files = generate_reg_api_from_file_with_config(
        args.input,
        &parse_config,
        &NameConfig::with_defaults(),
        &output_config,
    )?;
    println!("Accessors: {}", files.api.accessors.len());

    let artifacts = [
        (header_path, files.declarations),
        (args.output.to_path_buf(), files.definitions),
    ];

    if args.check {
        return check(&artifacts);
    }

    write_all(&artifacts)?;
    for (path, _) in &artifacts {
        println!("Output written to: {}", path.display());
    }
    Ok(())
}

/// Compare generated text with the files on disk.
fn check(artifacts: &[(PathBuf, String)]) -> Result<()> {
    let mut stale = Vec::new();
    for (path, contents) in artifacts {
        match fs::read_to_string(path) {
            Ok(existing) if existing == *contents => {
                log::info!("{} is up to date", path.display());
            }
            Ok(_) => stale.push(path.display().to_string()),
            Err(e) => {
                log::warn!("cannot read {}: {e}", path.display());
                stale.push(path.display().to_string());
            }
        }
    }
    if !stale.is_empty() {
        bail!(
            "register API is out of date: {}; run `cargo xtask reg-api` to regenerate",
            stale.join(", ")
        );
    }
    println!("Register API is up to date.");
    Ok(())
}

/// Stage every artifact in a temporary file beside its destination, then
/// move them all into place. Nothing is left half written: destinations are
/// checked before anything moves, and if a later move still fails the
/// artifacts already moved are put back the way they were.
fn write_all(artifacts: &[(PathBuf, String)]) -> Result<()> {
    for (path, _) in artifacts {
        if path.is_dir() {
            bail!("Fail to write {}: it is a directory.", path.display());
        }
    }
    let mut staged = Vec::with_capacity(artifacts.len());
    for (path, contents) in artifacts {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Fail to open {}.", path.display()))?;
        tmp.write_all(contents.as_bytes())
            .with_context(|| format!("Fail to write {}.", path.display()))?;
        staged.push((tmp, path.as_path()));
    }
    persist_all(staged)
}

/// Move staged files to their destinations, restoring earlier destinations
/// if one fails.
fn persist_all(staged: Vec<(NamedTempFile, &Path)>) -> Result<()> {
    // previous contents of every destination replaced so far
    let mut replaced: Vec<(&Path, Option<Vec<u8>>)> = Vec::new();
    for (tmp, path) in staged {
        let previous = fs::read(path).ok();
        if let Err(e) = tmp.persist(path) {
            for (done, old) in replaced.into_iter().rev() {
                let restored = match old {
                    Some(old) => fs::write(done, old),
                    None => fs::remove_file(done),
                };
                if let Err(err) = restored {
                    log::error!("cannot restore {}: {err}", done.display());
                }
            }
            return Err(e.error).with_context(|| format!("Fail to write {}.", path.display()));
        }
        log::debug!("wrote {}", path.display());
        replaced.push((path, previous));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUX_XML: &str = r#"<xd:component xmlns:xd="http://www.xilinx.com/xidane">
  <xd:arg xd:name="arg_gain" xd:originalName="arg_gain" xd:offset="0x18" xd:dataWidth="16" xd:busTypeRef="axilite"/>
  <xd:arg xd:name="taps[0]" xd:originalName="arg_taps" xd:offset="0x40" xd:arraySize="5" xd:dataWidth="16" xd:busTypeRef="axilite"/>
  <xd:arg xd:name="p_in" xd:originalName="p_in" xd:offset="0x80" xd:dataWidth="32" xd:busTypeRef="m_axi"/>
</xd:component>
"#;

    fn args<'a>(input: &'a Path, output: &'a Path, check: bool) -> RegApiArgs<'a> {
        RegApiArgs {
            input,
            output,
            debug: false,
            bus: "axilite",
            strip_prefixes: &[],
            no_default_strip: false,
            check,
        }
    }

    #[test]
    fn test_generate_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("auxiliary.xml");
        fs::write(&input, AUX_XML).unwrap();
        let output = dir.path().join("blur_api.cpp");

        generate(&args(&input, &output, false)).unwrap();

        let header = fs::read_to_string(dir.path().join("blur_api.h")).unwrap();
        let source = fs::read_to_string(&output).unwrap();
        assert!(header.contains("int halide_zynq_set_gain(unsigned short gain);"));
        assert!(source.contains("#include \"blur_api.h\""));
        assert!(source.contains("int halide_zynq_set_taps(const unsigned short *taps) {"));
        assert!(!source.contains("p_in"));

        // freshly generated files pass the check
        generate(&args(&input, &output, true)).unwrap();
    }

    #[test]
    fn test_check_detects_drift() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("auxiliary.xml");
        fs::write(&input, AUX_XML).unwrap();
        let output = dir.path().join("api.cpp");

        // nothing generated yet
        assert!(generate(&args(&input, &output, true)).is_err());

        generate(&args(&input, &output, false)).unwrap();
        fs::write(&output, "stale").unwrap();
        let err = generate(&args(&input, &output, true)).unwrap_err();
        assert!(err.to_string().contains("api.cpp"));
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.xml");
        let output = dir.path().join("api.cpp");
        let err = generate(&args(&input, &output, false)).unwrap_err();
        assert!(err.to_string().starts_with("Missing file"));
        assert!(!output.exists());
        assert!(!dir.path().join("api.h").exists());
    }

    #[test]
    fn test_malformed_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("auxiliary.xml");
        fs::write(&input, "<xd:component><xd:arg xd:name=").unwrap();
        let output = dir.path().join("api.cpp");
        assert!(generate(&args(&input, &output, false)).is_err());
        assert!(!output.exists());
        assert!(!dir.path().join("api.h").exists());
    }

    #[test]
    fn test_unwritable_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("auxiliary.xml");
        fs::write(&input, AUX_XML).unwrap();
        let output = dir.path().join("no_such_dir").join("api.cpp");
        let err = generate(&args(&input, &output, false)).unwrap_err();
        assert!(err.to_string().starts_with("Fail to open"));
    }

    #[test]
    fn test_output_is_directory_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("auxiliary.xml");
        fs::write(&input, AUX_XML).unwrap();
        let output = dir.path().join("api.cpp");
        fs::create_dir(&output).unwrap();
        let err = generate(&args(&input, &output, false)).unwrap_err();
        assert!(err.to_string().contains("is a directory"));
        assert!(!dir.path().join("api.h").exists());
        assert!(output.is_dir());
    }

    #[test]
    fn test_failed_persist_restores_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("kept.h");
        let fresh = dir.path().join("fresh.h");
        let blocked = dir.path().join("blocked.cpp");
        fs::write(&kept, "old header").unwrap();
        fs::create_dir(&blocked).unwrap();

        let stage = |text: &str| {
            let mut tmp = NamedTempFile::new_in(dir.path()).unwrap();
            tmp.write_all(text.as_bytes()).unwrap();
            tmp
        };
        let staged = vec![
            (stage("new header"), kept.as_path()),
            (stage("new"), fresh.as_path()),
            (stage("new source"), blocked.as_path()),
        ];
        assert!(persist_all(staged).is_err());
        assert_eq!(fs::read_to_string(&kept).unwrap(), "old header");
        assert!(!fresh.exists());
        assert!(blocked.is_dir());
    }

    #[test]
    fn test_debug_and_prefix_options() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("auxiliary.xml");
        fs::write(&input, AUX_XML).unwrap();
        let output = dir.path().join("api.cpp");
        let prefixes = vec!["p_".to_string()];
        generate(&RegApiArgs {
            debug: true,
            bus: "m_axi",
            strip_prefixes: &prefixes,
            ..args(&input, &output, false)
        })
        .unwrap();
        let source = fs::read_to_string(&output).unwrap();
        assert!(source.contains("int halide_zynq_set_in(unsigned int in) {"));
        assert!(source.contains("printf(\"Setting in\\n\");"));
        assert!(!source.contains("gain"));
    }
}
