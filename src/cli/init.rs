use crate::cli::Context;
use crate::error::Result;
use crate::formats::builtin_formats;
use crate::settings::save_settings_to;

pub fn run(ctx: &Context, with_templates: bool, force: bool) -> Result<()> {
    let path = &ctx.settings_path;
    if path.exists() && !force {
        println!("Settings already exist at {} (use --force to overwrite)", path.display());
        return Ok(());
    }
    let mut settings = ctx.settings.clone();
    if with_templates {
        for builtin in builtin_formats()? {
            if !settings.formats.iter().any(|f| f.key == builtin.key) {
                settings.formats.push(builtin);
            }
        }
    }
    save_settings_to(&settings, path)?;
    println!("Wrote settings to {}", path.display());
    Ok(())
}
