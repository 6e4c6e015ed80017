//! Kana to romaji transliteration for entity comparison.
//!
//! Only what identity comparison needs: katakana folds onto hiragana, then
//! a fixed syllable table is applied longest-match-first (contracted
//! digraphs like `きゃ` before single kana). The sokuon `っ` doubles the
//! first letter of the following syllable and the long-vowel mark `ー`
//! contributes nothing. Characters outside the table pass through.

const KATAKANA_START: u32 = 0x30A1;
const KATAKANA_END: u32 = 0x30F6;
const KATAKANA_OFFSET: u32 = 0x60;

const SOKUON: char = 'っ';

const DIGRAPHS: &[(&str, &str)] = &[
    ("きゃ", "kya"),
    ("きゅ", "kyu"),
    ("きょ", "kyo"),
    ("しゃ", "sha"),
    ("しゅ", "shu"),
    ("しょ", "sho"),
    ("ちゃ", "cha"),
    ("ちゅ", "chu"),
    ("ちょ", "cho"),
    ("にゃ", "nya"),
    ("にゅ", "nyu"),
    ("にょ", "nyo"),
    ("ひゃ", "hya"),
    ("ひゅ", "hyu"),
    ("ひょ", "hyo"),
    ("みゃ", "mya"),
    ("みゅ", "myu"),
    ("みょ", "myo"),
    ("りゃ", "rya"),
    ("りゅ", "ryu"),
    ("りょ", "ryo"),
    ("ぎゃ", "gya"),
    ("ぎゅ", "gyu"),
    ("ぎょ", "gyo"),
    ("じゃ", "ja"),
    ("じゅ", "ju"),
    ("じょ", "jo"),
    ("びゃ", "bya"),
    ("びゅ", "byu"),
    ("びょ", "byo"),
    ("ぴゃ", "pya"),
    ("ぴゅ", "pyu"),
    ("ぴょ", "pyo"),
    ("ふぁ", "fa"),
    ("ふぃ", "fi"),
    ("ふぇ", "fe"),
    ("ふぉ", "fo"),
    ("てぃ", "ti"),
    ("でぃ", "di"),
    ("とぅ", "tu"),
    ("どぅ", "du"),
    ("うぃ", "wi"),
    ("うぇ", "we"),
    ("うぉ", "wo"),
    ("ゔぁ", "va"),
    ("ゔぃ", "vi"),
    ("ゔぇ", "ve"),
    ("ゔぉ", "vo"),
    ("つぁ", "tsa"),
    ("つぃ", "tsi"),
    ("つぇ", "tse"),
    ("つぉ", "tso"),
    ("ちぇ", "che"),
    ("しぇ", "she"),
    ("じぇ", "je"),
];

fn monograph(kana: char) -> Option<&'static str> {
    let romaji = match kana {
        'あ' => "a",
        'い' => "i",
        'う' => "u",
        'え' => "e",
        'お' => "o",
        'か' => "ka",
        'き' => "ki",
        'く' => "ku",
        'け' => "ke",
        'こ' => "ko",
        'さ' => "sa",
        'し' => "shi",
        'す' => "su",
        'せ' => "se",
        'そ' => "so",
        'た' => "ta",
        'ち' => "chi",
        'つ' => "tsu",
        'て' => "te",
        'と' => "to",
        'な' => "na",
        'に' => "ni",
        'ぬ' => "nu",
        'ね' => "ne",
        'の' => "no",
        'は' => "ha",
        'ひ' => "hi",
        'ふ' => "fu",
        'へ' => "he",
        'ほ' => "ho",
        'ま' => "ma",
        'み' => "mi",
        'む' => "mu",
        'め' => "me",
        'も' => "mo",
        'や' => "ya",
        'ゆ' => "yu",
        'よ' => "yo",
        'ら' => "ra",
        'り' => "ri",
        'る' => "ru",
        'れ' => "re",
        'ろ' => "ro",
        'わ' => "wa",
        'を' => "wo",
        'ん' => "n",
        'が' => "ga",
        'ぎ' => "gi",
        'ぐ' => "gu",
        'げ' => "ge",
        'ご' => "go",
        'ざ' => "za",
        'じ' => "ji",
        'ず' => "zu",
        'ぜ' => "ze",
        'ぞ' => "zo",
        'だ' => "da",
        'ぢ' => "di",
        'づ' => "du",
        'で' => "de",
        'ど' => "do",
        'ば' => "ba",
        'び' => "bi",
        'ぶ' => "bu",
        'べ' => "be",
        'ぼ' => "bo",
        'ぱ' => "pa",
        'ぴ' => "pi",
        'ぷ' => "pu",
        'ぺ' => "pe",
        'ぽ' => "po",
        'ゔ' => "vu",
        SOKUON | 'ー' => "",
        _ => return None,
    };
    Some(romaji)
}

/// Whether `c` is hiragana or katakana (including `ー` and `・`).
pub fn is_kana(c: char) -> bool {
    ('\u{3040}'..='\u{30FF}').contains(&c)
}

/// Fold katakana onto the matching hiragana code points.
pub fn katakana_to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if (KATAKANA_START..=KATAKANA_END).contains(&code) {
                char::from_u32(code - KATAKANA_OFFSET).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Transliterate kana in `text` to lowercase romaji.
pub fn to_romaji(text: &str) -> String {
    let chars: Vec<char> = katakana_to_hiragana(&text.to_lowercase()).chars().collect();
    let mut out = String::with_capacity(chars.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        if let Some(romaji) = chars.get(i + 1).and_then(|next| digraph(chars[i], *next)) {
            out.push_str(romaji);
            i += 2;
            continue;
        }

        let c = chars[i];
        match monograph(c) {
            Some(_) if c == SOKUON => {
                if let Some(first) = chars
                    .get(i + 1)
                    .and_then(|next| monograph(*next))
                    .and_then(|romaji| romaji.chars().next())
                {
                    out.push(first);
                }
            }
            Some(romaji) => out.push_str(romaji),
            None => out.push(c),
        }
        i += 1;
    }

    out
}

fn digraph(first: char, second: char) -> Option<&'static str> {
    DIGRAPHS.iter().find_map(|(kana, romaji)| {
        let mut pair = kana.chars();
        (pair.next() == Some(first) && pair.next() == Some(second)).then_some(*romaji)
    })
}
