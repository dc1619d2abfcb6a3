use crate::CLAP_STYLING;
use clap::{arg, command};

const VARIANTS: [&str; 5] = ["plain", "categorized", "titles", "fulltext", "full-text"];

fn index_arg() -> clap::Arg {
    arg!(-i --"index" <SOURCE>)
        .required(false)
        .help(
            "Article index: a JSON file, a .js data script or an http(s) URL. \
        Defaults to the index next to --page.",
        )
}

fn page_arg() -> clap::Arg {
    arg!(-p --"page" <PAGE>)
        .required(false)
        .help("URL or path of the page the search runs on (decides link depth)")
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("wikinav")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wikinav")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress spinners and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log debug output to stderr (RUST_LOG overrides)")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-c --"config" <PATH>)
                .required(false)
                .global(true)
                .help("Path to the config file (default: ~/.config/wikinav/config.toml)"),
        )
        .subcommand_required(true)
        .subcommand(
            command!("search")
                .about("Print the suggestions the search box offers for a query")
                .arg(arg!(<QUERY>).required(true).help("The text typed in the search box"))
                .arg(index_arg())
                .arg(page_arg())
                .arg(
                    arg!(--"variant" <VARIANT>)
                        .required(false)
                        .help("Search variant (default from config: categorized)")
                        .value_parser(VARIANTS),
                )
                .arg(
                    arg!(-l --"limit" <NUM>)
                        .required(false)
                        .help("Maximum number of suggestions, 0 for unlimited")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"html")
                        .required(false)
                        .help("Print the menu markup instead of terminal colours")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("resolve")
                .about("Print the link a selected record navigates to")
                .arg(arg!(<NAME>).required(true).help("Record name as found in the index"))
                .arg(index_arg())
                .arg(page_arg())
                .arg(
                    arg!(--"title-id" <ID>)
                        .required(false)
                        .help("Anchor of the heading")
                        .default_value(""),
                )
                .arg(
                    arg!(--"title" <TITLE>)
                        .required(false)
                        .help("Heading title; when set the link gets #<title-id>")
                        .default_value(""),
                ),
        )
        .subcommand(
            command!("ui")
                .about("Interactive search box in the terminal")
                .arg(index_arg())
                .arg(page_arg())
                .arg(
                    arg!(--"variant" <VARIANT>)
                        .required(false)
                        .help("Search variant (default from config: categorized)")
                        .value_parser(VARIANTS),
                ),
        )
        .subcommand(
            command!("lightbox")
                .about("Open the lightbox on an image of a page and show the modal")
                .arg(
                    arg!(-p --"page" <FILE>)
                        .required(true)
                        .help("HTML page containing the image")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"image" <ID>)
                        .required(false)
                        .help("Id of the clicked image")
                        .conflicts_with("list"),
                )
                .arg(
                    arg!(--"list")
                        .required(false)
                        .help("List the images the lightbox can open")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("image"),
                )
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Print the modal state as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("index")
                .about("Load an index and summarise it")
                .arg(index_arg())
                .arg(page_arg())
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Print the validated records as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
