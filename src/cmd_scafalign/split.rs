use clap::*;

use scafalign::libs::{fasta, fragment};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("split")
        .about("Splits scaffolds into pieces at runs of Ns")
        .after_help(
            r###"
Every run of 10 or more Ns (case-insensitive) ends a piece. Pieces are written
as FASTA records named <scaffold>_<piece>_<gap>:

* <scaffold> is the first word of the scaffold header
* <piece> counts from 1, left to right
* <gap> is the length of the N run after the piece, 0 for the last piece

Runs of Ns at either end of a scaffold are dropped.

Examples:
1. Write pieces to a file:
   scafalign split scaffolds.fa -o pieces.fa

2. Read from stdin:
   cat scaffolds.fa | scafalign split stdin

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Input FASTA file of scaffolds. [stdin] for standard input"),
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
    let infile = args.get_one::<String>("infile").unwrap();
    let mut writer = scafalign::writer(args.get_one::<String>("outfile").unwrap())?;

    let (n_scaffolds, n_fragments) = fragment::split_all(fasta::open(infile)?, &mut writer)?;
    tracing::info!("{} scaffolds split into {} pieces", n_scaffolds, n_fragments);

    Ok(())
}
