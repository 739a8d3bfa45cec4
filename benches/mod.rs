/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/
use criterion::{criterion_group, criterion_main};


criterion_group!(benches, mailbox_bench::register_benchmarks);
criterion_main!(benches);
