use clap::*;
use std::io::Write;

use scafalign::libs::aligner::{Aligner, DEFAULT_ALIGNER};
use scafalign::libs::resolve::resolve_report;
use scafalign::libs::{fasta, fragment};

// Arguments of the top-level command, which runs the whole pipeline
pub fn make_args() -> Vec<Arg> {
    vec![
        Arg::new("reference")
            .required(true)
            .index(1)
            .help("Reference FASTA file"),
        Arg::new("scaffolds")
            .required(true)
            .index(2)
            .help("Scaffold FASTA file"),
        Arg::new("aligner")
            .long("aligner")
            .num_args(1)
            .default_value(DEFAULT_ALIGNER)
            .help("ssaha2 executable"),
        Arg::new("identity")
            .long("identity")
            .num_args(1)
            .default_value("99")
            .value_parser(value_parser!(u32).range(0..=100))
            .help("Minimum identity (percent) of alignments"),
        Arg::new("pieces")
            .long("pieces")
            .num_args(1)
            .help("Keep the pieces FASTA at this path instead of a temporary file"),
        Arg::new("sort")
            .long("sort")
            .action(ArgAction::SetTrue)
            .help("Group the alignment report in two passes, so it can be in any order"),
        Arg::new("outfile")
            .long("outfile")
            .short('o')
            .num_args(1)
            .default_value("stdout")
            .help("Output filename. [stdout] for screen"),
        super::make_verbose_arg(),
    ]
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let reference = args.get_one::<String>("reference").unwrap();
    let scaffolds = args.get_one::<String>("scaffolds").unwrap();
    let aligner = Aligner::new(
        args.get_one::<String>("aligner").unwrap(),
        *args.get_one::<u32>("identity").unwrap(),
    );
    let opt_sort = args.get_flag("sort");
    let outfile = args.get_one::<String>("outfile").unwrap();

    //----------------------------
    // Split
    //----------------------------
    // The temporary file lives until the aligner has finished
    let mut _temp_pieces: Option<tempfile::NamedTempFile> = None;
    let pieces = match args.get_one::<String>("pieces") {
        Some(path) => path.clone(),
        None => {
            let temp = tempfile::Builder::new()
                .prefix("pieces.")
                .suffix(".fa")
                .tempfile()?;
            let path = temp.path().display().to_string();
            _temp_pieces = Some(temp);
            path
        }
    };

    {
        let mut writer = scafalign::writer(&pieces)?;
        let (n_scaffolds, n_fragments) =
            fragment::split_all(fasta::open(scaffolds)?, &mut writer)?;
        tracing::info!(
            "{} scaffolds split into {} pieces in {}",
            n_scaffolds,
            n_fragments,
            pieces
        );
    }

    //----------------------------
    // Align and resolve
    //----------------------------
    let mut run = aligner.spawn(reference, &pieces)?;
    let report = match run.take_report() {
        Some(report) => report,
        None => anyhow::bail!("No report from {}", aligner.program),
    };

    let resolved = scafalign::writer(outfile).and_then(|mut writer| {
        let lines = resolve_report(report, opt_sort, &mut writer)?;
        writer.flush()?;
        Ok(lines)
    });
    let lines = match resolved {
        Ok(lines) => lines,
        Err(e) => {
            run.abort()?;
            return Err(e.into());
        }
    };

    run.wait()?;
    tracing::info!("{} scaffolds placed", lines);

    Ok(())
}
