pub mod aligner;
pub mod cigar;
pub mod combo;
pub mod error;
pub mod fasta;
pub mod fragment;
pub mod group;
pub mod io;
pub mod resolve;
pub mod score;
