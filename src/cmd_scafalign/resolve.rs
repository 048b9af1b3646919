use clap::*;
use std::io::Write;

use scafalign::libs::resolve::resolve_report;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("resolve")
        .about("Places scaffolds using an existing cigar report")
        .after_help(
            r###"
Reads the output of `ssaha2 -output cigar` run on pieces made by
`scafalign split`, and prints the best placement of each scaffold.

For each scaffold, every combination of one alignment per piece is scored:
* all pieces must be on the same strand (otherwise -1)
* target starts must increase on + and decrease on - (otherwise -2 / -3)
* each gap between pieces is compared with the length of the N run it replaced

Output, one line per scaffold:
    score <TAB> +<start,end> (observed/expected) +<start,end> ... scaffold

Scaffolds with a piece that has no alignment are not reported.

The report is expected in ssaha2's order, grouped by scaffold and piece.
Use --sort for reports that were merged or reordered.

Examples:
1. Resolve a saved report:
   scafalign resolve pieces.cigar

2. Resolve a merged report:
   cat part1.cigar part2.cigar | scafalign resolve stdin --sort

"###,
        )
        .arg(
            Arg::new("infile")
                .index(1)
                .default_value("stdin")
                .help("ssaha2 cigar report. [stdin] for standard input"),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .action(ArgAction::SetTrue)
                .help("Group the report in two passes, so it can be in any order"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
        .arg(super::make_verbose_arg())
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let reader = scafalign::reader(args.get_one::<String>("infile").unwrap())?;
    let mut writer = scafalign::writer(args.get_one::<String>("outfile").unwrap())?;
    let opt_sort = args.get_flag("sort");

    let lines = resolve_report(reader, opt_sort, &mut writer)?;
    writer.flush()?;
    tracing::info!("{} scaffolds placed", lines);

    Ok(())
}
