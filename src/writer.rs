//! CoNLL-U output
//!
//! Writes a sentence back in the format it was read from: metadata comments,
//! then every row but the artificial root in address order, then a blank line.

use std::io::{self, Write};

use crate::features::FeatureCodec;
use crate::row::{Columns, Row};
use crate::tree::{Metadata, SentenceTree};

/// Format one row as a tab-separated line, without the newline.
pub fn format_row(row: &Row, codec: &FeatureCodec) -> String {
    let mut line = [
        row.id.to_string(),
        row.form.clone(),
        row.lemma.clone(),
        row.upos.clone(),
        row.xpos.clone(),
        codec.encode(&row.feats),
        row.head.to_string(),
        row.deprel.clone(),
        row.deps.clone(),
        codec.encode(&row.misc),
    ]
    .join("\t");

    if let Columns::Extended(extra) = &row.columns {
        for (_, value) in extra {
            line.push('\t');
            line.push_str(value);
        }
    }
    line
}

/// Write `tree` with its `metadata` as one CoNLL-U sentence.
pub fn write_sentence<W: Write>(
    writer: &mut W,
    metadata: &Metadata,
    tree: &SentenceTree,
    codec: &FeatureCodec,
) -> io::Result<()> {
    for (key, value) in metadata.iter() {
        if value.is_empty() {
            writeln!(writer, "# {}", key)?;
        } else {
            writeln!(writer, "# {} = {}", key, value)?;
        }
    }
    for row in tree.rows().filter(|row| !row.id.is_root()) {
        writeln!(writer, "{}", format_row(row, codec))?;
    }
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conllu::{CoNLLUReader, ReaderOptions};

    #[test]
    fn test_write_round_trip() {
        let conllu = "# sent_id = 1
# text = nobiscum venit
1-2\tnobiscum\t_\t_\t_\t_\t_\t_\t_\t_
1\tnobis\tnos\tPRON\t_\tCase=Abl|Number=Plur\t3\tobl\t_\t_
2\tcum\tcum\tADP\t_\t_\t1\tcase\t_\t_
3\tvenit\tvenio\tVERB\t_\tTense=Pres|Mood=Ind\t0\troot\t_\tSpaceAfter=No

";
        let mut reader = CoNLLUReader::from_string(conllu, ReaderOptions::default()).unwrap();
        let (meta, tree) = reader.next().unwrap().unwrap();

        let mut out = Vec::new();
        write_sentence(&mut out, &meta, &tree, &FeatureCodec::default()).unwrap();
        let written = String::from_utf8(out).unwrap();

        let expected = "# sent_id = 1
# text = nobiscum venit
1-2\tnobiscum\t_\t_\t_\t_\t_\t_\t_\t_
1\tnobis\tnos\tPRON\t_\tCase=Abl|Number=Plur\t3\tobl\t_\t_
2\tcum\tcum\tADP\t_\t_\t1\tcase\t_\t_
3\tvenit\tvenio\tVERB\t_\tMood=Ind|Tense=Pres\t0\troot\t_\tSpaceAfter=No

";
        assert_eq!(written, expected);
    }

    #[test]
    fn test_format_extended_row() {
        let conllu = "# global.columns = ID FORM HEAD DEPREL PARSEME:MWE
1\tcanis\t0\troot\t1:VID
";
        let options = ReaderOptions::default().plus(true);
        let mut reader = CoNLLUReader::from_string(conllu, options).unwrap();
        let (_, tree) = reader.next().unwrap().unwrap();
        let row = tree.syntactic_words().next().unwrap();

        assert_eq!(
            format_row(row, &FeatureCodec::default()),
            "1\tcanis\t_\t_\t_\t_\t0\troot\t_\t_\t1:VID"
        );
    }
}
