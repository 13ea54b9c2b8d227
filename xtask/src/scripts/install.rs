use crate::cli;
use color_eyre::eyre::{eyre, Result};
use duct::cmd;
use std::env;
use std::path::{Path, PathBuf};

/// `~/.local/bin`, or `args.path` when given.
fn install_dir(args: &cli::InstallArgs) -> Result<PathBuf> {
    if let Some(path) = &args.path {
        return Ok(PathBuf::from(path));
    }
    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map_err(|_| eyre!("could not determine home directory; pass --path"))?;
    Ok(PathBuf::from(home).join(".local").join("bin"))
}

fn is_on_path(dir: &Path) -> bool {
    env::var_os("PATH").is_some_and(|path| env::split_paths(&path).any(|p| p == dir))
}

pub fn install(args: &cli::InstallArgs) -> Result<()> {
    println!("Building {} in release mode...", args.name);
    cmd!("cargo", "build", "--bin", &args.name, "--release").run()?;

    let install_dir = install_dir(args)?;
    std::fs::create_dir_all(&install_dir)?;

    let source_path = PathBuf::from("target").join("release").join(&args.name);
    let dest_path = install_dir.join(&args.name);
    std::fs::copy(&source_path, &dest_path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&dest_path, std::fs::Permissions::from_mode(0o755))?;
    }

    // Unsigned copies get killed on macOS.
    #[cfg(target_os = "macos")]
    {
        if let Err(e) = cmd!("codesign", "--force", "--sign", "-", &dest_path).run() {
            eprintln!("Warning: failed to re-sign {}: {e}", dest_path.display());
        }
    }

    println!("✓ Installed {} to {}", args.name, dest_path.display());

    if !is_on_path(&install_dir) {
        println!("\nNote: {} is not in your PATH.", install_dir.display());
        println!("  export PATH=\"{}:$PATH\"", install_dir.display());
    }

    Ok(())
}
