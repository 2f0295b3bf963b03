//! Configure command: run one configuration session for a site type.
//!
//! Value source selection: `--set` pairs win when given; otherwise an
//! attended terminal gets interactive prompts and piped stdin is read as a
//! scripted channel, one value per line.

use std::io::BufReader;

use console::style;

use crate::cli::{Cli, ConfigureArgs};
use crate::error::Result;
use crate::host::CONFIG_DIR;
use crate::template::collect::{
    InteractiveSource, PresetSource, ScriptedSource, ValueSource, parse_set_pairs,
};
use crate::template::fetch::{TemplateFetcher, TemplateSource};
use crate::template::session::ConfigSession;

pub fn run(cli: &Cli, args: &ConfigureArgs) -> Result<()> {
    let (view, _profile) = super::host_context(cli);
    let fetcher = TemplateFetcher::new(TemplateSource::parse(&cli.templates));
    let config_dir = view.path(CONFIG_DIR);

    let stdin = std::io::stdin();
    let mut source: Box<dyn ValueSource> = if !args.set.is_empty() {
        Box::new(PresetSource::new(parse_set_pairs(&args.set)?))
    } else if console::user_attended() {
        Box::new(InteractiveSource)
    } else {
        Box::new(ScriptedSource::new(BufReader::new(stdin.lock())))
    };

    let written =
        ConfigSession::new(&fetcher, config_dir, source.as_mut()).run(args.site_type)?;
    println!(
        "{} {} configuration file(s) generated",
        style("Done:").green().bold(),
        written.len()
    );
    Ok(())
}
