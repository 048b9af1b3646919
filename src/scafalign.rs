extern crate clap;
use clap::*;

mod cmd_scafalign;

fn main() -> anyhow::Result<()> {
    let app = Command::new("scafalign")
        .version(crate_version!())
        .about("`scafalign` - Place gapped scaffolds on a reference")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .args(cmd_scafalign::run::make_args())
        .subcommand_negates_reqs(true)
        .args_conflicts_with_subcommands(true)
        .subcommand(cmd_scafalign::split::make_subcommand())
        .subcommand(cmd_scafalign::resolve::make_subcommand())
        .after_help(
            r###"Usage:

* Full pipeline:
    scafalign <reference> <scaffolds>
    Splits scaffolds at runs of 10 or more Ns, aligns the pieces with ssaha2
    and prints the most consistent placement of every scaffold.

* Stages:
    * split   - Split scaffolds into pieces
    * resolve - Place scaffolds from an existing ssaha2 cigar report

"###,
        );

    let matches = app.get_matches();

    // Check which subcommand the user ran...
    match matches.subcommand() {
        Some(("split", sub_matches)) => {
            cmd_scafalign::init_logging(sub_matches.get_flag("verbose"));
            cmd_scafalign::split::execute(sub_matches)
        }
        Some(("resolve", sub_matches)) => {
            cmd_scafalign::init_logging(sub_matches.get_flag("verbose"));
            cmd_scafalign::resolve::execute(sub_matches)
        }
        None => {
            cmd_scafalign::init_logging(matches.get_flag("verbose"));
            cmd_scafalign::run::execute(&matches)
        }
        _ => unreachable!(),
    }?;

    Ok(())
}
