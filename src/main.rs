use std::io;
use std::path::PathBuf;
use anyhow;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use figfont::{catalog, Header, TrailingBlock};
use tracing_subscriber::EnvFilter;

fn command_parser() -> Command {
    let strict = Arg::new("strict")
        .long("strict")
        .help("Reject fonts whose last glyph block is incomplete")
        .env("FIGFONT_STRICT")
        .action(ArgAction::SetTrue)
        .global(true);

    let font = Arg::new("font")
        .value_parser(value_parser!(PathBuf))
        .required(true);

    Command::new("figfont")
        .about("Inspects FIGlet font files")
        .arg(strict)
        .subcommand(
            Command::new("inspect")
                .about("Prints the header and character list of a font")
                .arg(font.clone()),
        )
        .subcommand(
            Command::new("glyph")
                .about("Prints the design of one character")
                .arg(font)
                .arg(Arg::new("char").required(true)),
        )
        .subcommand(
            Command::new("random")
                .about("Picks a random font from a directory")
                .arg(Arg::new("dir").value_parser(value_parser!(PathBuf)).required(true)),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
}

fn print_header(header: &Header, comment_count: usize) {
    println!("signature:       {}", header.signature);
    println!("hard blank:      {:?}", header.hard_blank);
    println!("height:          {}", header.height);
    println!("baseline:        {}", header.baseline);
    println!("max length:      {}", header.max_length);
    println!("old layout:      {}", header.old_layout);
    println!("comment lines:   {}", comment_count);
    if let Some(print_direction) = header.print_direction {
        println!("print direction: {}", print_direction);
    }
    if let Some(full_layout) = header.full_layout {
        println!("full layout:     {}", full_layout);
    }
    if let Some(codetag_count) = header.codetag_count {
        println!("codetag count:   {}", codetag_count);
    }
}

fn path_arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a PathBuf {
    matches
        .get_one::<PathBuf>(name)
        .unwrap_or_else(|| unreachable!("`{}` is a required argument", name))
}

fn inspect(matches: &ArgMatches, policy: TrailingBlock) -> anyhow::Result<()> {
    let font = catalog::load_font(path_arg(matches, "font"), policy)?;
    if let Some(contents) = font.file_contents() {
        print_header(&contents.header, contents.comments.len());
    }
    println!("glyphs:          {}", font.len());
    for (ch, glyph) in &font {
        println!("[{:?}] {}x{}", ch, glyph.width(), glyph.height());
    }
    Ok(())
}

fn glyph(matches: &ArgMatches, policy: TrailingBlock) -> anyhow::Result<()> {
    let font = catalog::load_font(path_arg(matches, "font"), policy)?;
    let arg = matches
        .get_one::<String>("char")
        .unwrap_or_else(|| unreachable!("`char` is a required argument"));
    let mut chars = arg.chars();
    let ch = match (chars.next(), chars.next()) {
        (Some(ch), None) => ch,
        _ => anyhow::bail!("expected a single character, got {:?}", arg),
    };
    let design = font
        .glyph(ch)
        .ok_or_else(|| anyhow::anyhow!("font has no glyph for {:?}", ch))?;
    println!("{}", design);
    Ok(())
}

fn random(matches: &ArgMatches, policy: TrailingBlock) -> anyhow::Result<()> {
    let dir = path_arg(matches, "dir");
    match catalog::random_font(dir, policy, &mut rand::thread_rng())? {
        Some((path, _)) => println!("{}", path.display()),
        None => anyhow::bail!("no usable fonts in {}", dir.display()),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let matches = command_parser().get_matches();
    let policy = if matches.get_flag("strict") {
        TrailingBlock::Reject
    } else {
        TrailingBlock::Discard
    };

    match matches.subcommand() {
        Some(("inspect", sub)) => inspect(sub, policy),
        Some(("glyph", sub)) => glyph(sub, policy),
        Some(("random", sub)) => random(sub, policy),
        _ => unreachable!("subcommand is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_parser_is_valid() {
        command_parser().debug_assert();
    }

    #[test]
    fn strict_flag_is_global() {
        let matches = command_parser()
            .try_get_matches_from(["figfont", "inspect", "standard.flf", "--strict"])
            .unwrap();
        assert!(matches.get_flag("strict"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "inspect");
        assert_eq!(path_arg(sub, "font"), &PathBuf::from("standard.flf"));
    }
}
