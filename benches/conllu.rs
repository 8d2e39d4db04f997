use divan::{Bencher, black_box};
use udnucleus::{CoNLLUReader, ReaderOptions};

fn main() {
    divan::main();
}

/// Synthetic corpus: `n` sentences of seven tokens each
fn corpus(n: usize) -> String {
    let sentence = "# sent_id = s\n\
# text = Gallia est omnis divisa in partes tres\n\
1\tGallia\tGallia\tPROPN\t_\tCase=Nom|Gender=Fem|Number=Sing\t4\tnsubj:pass\t_\t_\n\
2\test\tsum\tAUX\t_\tMood=Ind|Number=Sing|Person=3|Tense=Pres\t4\taux:pass\t_\t_\n\
3\tomnis\tomnis\tDET\t_\tCase=Nom|Number=Sing\t1\tdet\t_\t_\n\
4\tdivisa\tdivido\tVERB\t_\tAspect=Perf|VerbForm=Part|Voice=Pass\t0\troot\t_\t_\n\
5\tin\tin\tADP\t_\t_\t6\tcase\t_\t_\n\
6\tpartes\tpars\tNOUN\t_\tCase=Acc|Number=Plur\t4\tobl\t_\t_\n\
7\ttres\ttres\tNUM\t_\tCase=Acc|NumType=Card\t6\tnummod\t_\tSpaceAfter=No\n\
\n";
    sentence.repeat(n)
}

#[divan::bench(args = [100, 1000])]
fn read_sentences(bencher: Bencher, n: usize) {
    let text = corpus(n);
    bencher.bench_local(|| {
        let reader = CoNLLUReader::from_string(black_box(&text), ReaderOptions::default()).unwrap();
        for result in reader {
            black_box(result.unwrap());
        }
    });
}
