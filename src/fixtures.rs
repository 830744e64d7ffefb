// Test fixtures: a small export covering every record shape

use crate::builder::build_hierarchy;
use crate::db::write_hierarchy;
use crate::parser::{parse_records, FlatRecord};
use rusqlite::Connection;

pub const SAMPLE_EXPORT: &str = "\
0001,,ﾐｽﾞﾎ,みずほ,1,\r
0001,001,ﾄｳｷﾖｳｴｲｷﾞﾖｳﾌﾞ,東京営業部,2,1\r
0001,004,ﾏﾙﾉｳﾁ,丸の内,2,1\r
0001,004,ﾊﾈﾀﾞｸｳｺｳ,羽田空港出張所,2,2\r
0001,004,ｵｵﾃﾏﾁ,大手町出張所,2,2\r
0001,002,ｷﾁｼﾞﾖｳｼﾞ,吉祥寺,2,1\r
0005,,ﾐﾂﾋﾞｼﾕｰｴﾌｼﾞｴｲ,三菱ＵＦＪ,1,\r
0005,001,ﾎﾝﾃﾝ,本店,2,1\r
0005,330,ｷﾁｼﾞﾖｳｼﾞ,吉祥寺,2,1\r
0009,,ﾐﾂｲｽﾐﾄﾓ,三井住友,1,\r
0009,100,ｷﾁｼﾞﾖｳｼﾞ,吉祥寺,2,1\r
0010,,ﾘｿﾅ,りそな,1,\r
0010,100,ﾄｳｷﾖｳｴｲｷﾞﾖｳﾌﾞ,東京営業部,2,1\r
0017,,ｻｲﾀﾏﾘｿﾅ,埼玉りそな,1,\r
0401,,ｼﾃｲﾊﾞﾝｸｴﾇｴｲ,シティバンク、エヌ・エイ,1,\r
1001,,ﾎﾂｶｲﾄﾞｳｼﾝｷﾝ,北海道信金,1,\r
1001,001,ﾎﾝﾃﾝ,本店,2,1\r
2004,,ｼﾖｳｺｳﾁﾕｳｷﾝ,商工中金,1,\r
9900,,ﾕｳﾁﾖ,ゆうちょ,1,\r
9900,018,ｾﾞﾛｲﾁﾊﾁ,〇一八,2,1\r
";

pub fn sample_records() -> Vec<FlatRecord> {
    parse_records(SAMPLE_EXPORT.as_bytes()).unwrap()
}

/// In-memory store built from the sample export.
pub fn sample_connection() -> Connection {
    let hierarchy = build_hierarchy(sample_records()).unwrap();
    let mut conn = Connection::open_in_memory().unwrap();
    write_hierarchy(&mut conn, &hierarchy).unwrap();
    conn
}
