//! Token kinds for the Tusmo lexer.
//!
//! This module defines the [`TokenKind`] enum representing every token type
//! in the Tusmo language, and the keyword lookup used by the lexer.
//!
//! Several Somali keyword operators (`iyo`, `ama`, `lamid`, `weyn`, `yar`,
//! `weyn_lamid`, `yar_lamid`, `ahayn`) are aliases for symbolic operators
//! and lex to the same kinds as their symbols, so the parser never has to
//! care which spelling was written.

/// A raw part of a formatted-string literal.
///
/// The lexer splits `$"…"` content at unescaped `{…}` boundaries into
/// alternating text and expression parts. Expression parts stay raw source
/// substrings until the f-string resolver re-parses them.
#[derive(Debug, Clone, PartialEq)]
pub enum FStringRawPart {
    /// Literal text, with escape sequences already decoded.
    Text(String),
    /// An unparsed expression snippet from inside `{…}`.
    Expr(String),
}

/// The kind of token recognized by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// An integer literal (e.g., `42`).
    Int(i64),

    /// A float literal (e.g., `3.14`).
    Float(f64),

    /// A string literal. The contained value is already unescaped; both
    /// `"…"` and triple-quoted `"""…"""` forms produce this kind.
    Str(String),

    /// A formatted string literal (`$"…"` or `$"""…"""`), pre-split into
    /// text and raw expression parts.
    FStr(Vec<FStringRawPart>),

    /// A char literal (`'a'`).
    Char(char),

    /// An identifier.
    Identifier(String),

    // --- Declaration and type keywords ---
    /// `keyd` - variable declaration.
    Keyd,
    /// `tiro` - the int type (also the int cast builtin).
    Tiro,
    /// `eray` - the string type (also the string cast builtin).
    Eray,
    /// `xaraf` - the char type.
    Xaraf,
    /// `miyaa` - the bool type (also the bool cast builtin).
    Miyaa,
    /// `jajab` - the float type (also the float cast builtin).
    Jajab,
    /// `waxbo` - the void type.
    Waxbo,
    /// `tix` - the array type constructor.
    Tix,
    /// `qaamuus` - the dictionary type.
    Qaamuus,
    /// `tix_cayiman` - preallocated array creation builtin.
    TixCayiman,

    // --- Literal keywords ---
    /// `run` - boolean true.
    Run,
    /// `haa` - boolean true (alternate spelling).
    Haa,
    /// `been` - boolean false.
    Been,
    /// `maya` - boolean false (alternate spelling).
    Maya,

    // --- Statement keywords ---
    /// `hel` - read from stdin.
    Hel,
    /// `qor` - print.
    Qor,
    /// `show` - reserved, no grammar rule yet.
    Show,
    /// `haddii` - if.
    Haddii,
    /// `ama_haddii` - else-if.
    AmaHaddii,
    /// `haddii_kale` - else.
    HaddiiKale,
    /// `hawl` - function declaration (also the function-type constructor).
    Hawl,
    /// `shaqo` - function declaration (alternate spelling).
    Shaqo,
    /// `soo_celi` - return.
    SooCeli,
    /// `inta` - while (first word of `inta ay`).
    Inta,
    /// `ay` - while (second word of `inta ay`).
    Ay,
    /// `samay` - do (post-test loop).
    Samay,
    /// `soco` - for (both counted and for-each loops).
    Soco,
    /// `laga` - loop range connective.
    Laga,
    /// `bilaabo` - loop range connective (`from`).
    Bilaabo,
    /// `kasta` - for-each connective (`each`).
    Kasta,
    /// `helo` - for-each connective.
    Helo,
    /// `joog` - break.
    Joog,
    /// `kasoco` - continue.
    Kasoco,
    /// `keen` - module import.
    Keen,

    // --- Class keywords ---
    /// `koox` - class declaration.
    Koox,
    /// `cusub` - postfix instantiation (`new`).
    Cusub,
    /// `kan` - self reference inside methods.
    Kan,
    /// `dhis` - constructor method name.
    Dhis,
    /// `burbur` - reserved for destructors, no grammar rule yet.
    Burbur,
    /// `dhaxlaya` - inheritance clause (`inherits`).
    Dhaxlaya,
    /// `waalid` - parent reference inside methods.
    Waalid,
    /// `gali` - array append/insert builtin method.
    Gali,

    // --- Builtin query keywords ---
    /// `nooc` - type query builtin.
    Nooc,
    /// `dherer` - length query builtin.
    Dherer,

    // --- Embedded C ---
    /// `__C_CODE__` - embedded C statement marker.
    CCode,
    /// `__C_CALL__` - embedded C call expression marker.
    CCall,

    // --- Punctuation and operators ---
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `?`
    Question,
    /// `=`
    Equals,
    /// `+=`
    PlusEqual,
    /// `-=`
    MinusEqual,
    /// `*=`
    StarEqual,
    /// `/=`
    SlashEqual,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `.`
    Dot,
    /// `..` - range separator in counted loops.
    DotDot,
    /// `==` (also the keyword `lamid`).
    EqualEqual,
    /// `!=` (also the keyword `ahayn`).
    BangEqual,
    /// `>` (also the keyword `weyn`).
    Greater,
    /// `<` (also the keyword `yar`).
    Less,
    /// `>=` (also the keyword `weyn_lamid`).
    GreaterEqual,
    /// `<=` (also the keyword `yar_lamid`).
    LessEqual,
    /// `=>` - accepted as a synonym for `:` in function signatures.
    Arrow,
    /// `&&` (also the keyword `iyo`).
    AndAnd,
    /// `||` (also the keyword `ama`).
    OrOr,

    /// End of file marker. The lexer always appends this as the final
    /// token, so the token vector is never empty.
    Eof,
}

impl TokenKind {
    /// Maps a reserved word to its token kind.
    ///
    /// Returns `None` when `ident` is an ordinary identifier. Keyword
    /// operators map straight onto the symbolic operator kinds.
    pub fn from_keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident {
            "keyd" => TokenKind::Keyd,
            "tiro" => TokenKind::Tiro,
            "eray" => TokenKind::Eray,
            "xaraf" => TokenKind::Xaraf,
            "miyaa" => TokenKind::Miyaa,
            "jajab" => TokenKind::Jajab,
            "waxbo" => TokenKind::Waxbo,
            "tix" => TokenKind::Tix,
            "qaamuus" => TokenKind::Qaamuus,
            "tix_cayiman" => TokenKind::TixCayiman,
            "run" => TokenKind::Run,
            "haa" => TokenKind::Haa,
            "been" => TokenKind::Been,
            "maya" => TokenKind::Maya,
            "hel" => TokenKind::Hel,
            "qor" => TokenKind::Qor,
            "show" => TokenKind::Show,
            "haddii" => TokenKind::Haddii,
            "ama_haddii" => TokenKind::AmaHaddii,
            "haddii_kale" => TokenKind::HaddiiKale,
            "hawl" => TokenKind::Hawl,
            "shaqo" => TokenKind::Shaqo,
            "soo_celi" => TokenKind::SooCeli,
            "inta" => TokenKind::Inta,
            "ay" => TokenKind::Ay,
            "samay" => TokenKind::Samay,
            "soco" => TokenKind::Soco,
            "laga" => TokenKind::Laga,
            "bilaabo" => TokenKind::Bilaabo,
            "kasta" => TokenKind::Kasta,
            "helo" => TokenKind::Helo,
            "joog" => TokenKind::Joog,
            "kasoco" => TokenKind::Kasoco,
            "keen" => TokenKind::Keen,
            "koox" => TokenKind::Koox,
            "cusub" => TokenKind::Cusub,
            "kan" => TokenKind::Kan,
            "dhis" => TokenKind::Dhis,
            "burbur" => TokenKind::Burbur,
            "dhaxlaya" => TokenKind::Dhaxlaya,
            "waalid" => TokenKind::Waalid,
            "gali" => TokenKind::Gali,
            "nooc" => TokenKind::Nooc,
            "dherer" => TokenKind::Dherer,
            "__C_CODE__" => TokenKind::CCode,
            "__C_CALL__" => TokenKind::CCall,
            // Keyword operators lex straight to operator kinds.
            "iyo" => TokenKind::AndAnd,
            "ama" => TokenKind::OrOr,
            "lamid" => TokenKind::EqualEqual,
            "ahayn" => TokenKind::BangEqual,
            "weyn" => TokenKind::Greater,
            "yar" => TokenKind::Less,
            "weyn_lamid" => TokenKind::GreaterEqual,
            "yar_lamid" => TokenKind::LessEqual,
            _ => return None,
        };
        Some(kind)
    }
}

impl std::fmt::Display for TokenKind {
    /// Writes the source-level spelling of the token, used in diagnostics.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TokenKind::Int(v) => return write!(f, "{}", v),
            TokenKind::Float(v) => return write!(f, "{}", v),
            TokenKind::Str(s) => return write!(f, "\"{}\"", s),
            TokenKind::FStr(_) => return write!(f, "$\"…\""),
            TokenKind::Char(c) => return write!(f, "'{}'", c),
            TokenKind::Identifier(name) => return write!(f, "{}", name),
            TokenKind::Keyd => "keyd",
            TokenKind::Tiro => "tiro",
            TokenKind::Eray => "eray",
            TokenKind::Xaraf => "xaraf",
            TokenKind::Miyaa => "miyaa",
            TokenKind::Jajab => "jajab",
            TokenKind::Waxbo => "waxbo",
            TokenKind::Tix => "tix",
            TokenKind::Qaamuus => "qaamuus",
            TokenKind::TixCayiman => "tix_cayiman",
            TokenKind::Run => "run",
            TokenKind::Haa => "haa",
            TokenKind::Been => "been",
            TokenKind::Maya => "maya",
            TokenKind::Hel => "hel",
            TokenKind::Qor => "qor",
            TokenKind::Show => "show",
            TokenKind::Haddii => "haddii",
            TokenKind::AmaHaddii => "ama_haddii",
            TokenKind::HaddiiKale => "haddii_kale",
            TokenKind::Hawl => "hawl",
            TokenKind::Shaqo => "shaqo",
            TokenKind::SooCeli => "soo_celi",
            TokenKind::Inta => "inta",
            TokenKind::Ay => "ay",
            TokenKind::Samay => "samay",
            TokenKind::Soco => "soco",
            TokenKind::Laga => "laga",
            TokenKind::Bilaabo => "bilaabo",
            TokenKind::Kasta => "kasta",
            TokenKind::Helo => "helo",
            TokenKind::Joog => "joog",
            TokenKind::Kasoco => "kasoco",
            TokenKind::Keen => "keen",
            TokenKind::Koox => "koox",
            TokenKind::Cusub => "cusub",
            TokenKind::Kan => "kan",
            TokenKind::Dhis => "dhis",
            TokenKind::Burbur => "burbur",
            TokenKind::Dhaxlaya => "dhaxlaya",
            TokenKind::Waalid => "waalid",
            TokenKind::Gali => "gali",
            TokenKind::Nooc => "nooc",
            TokenKind::Dherer => "dherer",
            TokenKind::CCode => "__C_CODE__",
            TokenKind::CCall => "__C_CALL__",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Question => "?",
            TokenKind::Equals => "=",
            TokenKind::PlusEqual => "+=",
            TokenKind::MinusEqual => "-=",
            TokenKind::StarEqual => "*=",
            TokenKind::SlashEqual => "/=",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::Greater => ">",
            TokenKind::Less => "<",
            TokenKind::GreaterEqual => ">=",
            TokenKind::LessEqual => "<=",
            TokenKind::Arrow => "=>",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Eof => "end of file",
        };
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::from_keyword("keyd"), Some(TokenKind::Keyd));
        assert_eq!(TokenKind::from_keyword("koox"), Some(TokenKind::Koox));
        assert_eq!(TokenKind::from_keyword("soo_celi"), Some(TokenKind::SooCeli));
        assert_eq!(TokenKind::from_keyword("magac"), None);
    }

    #[test]
    fn test_keyword_operator_aliases() {
        assert_eq!(TokenKind::from_keyword("iyo"), Some(TokenKind::AndAnd));
        assert_eq!(TokenKind::from_keyword("ama"), Some(TokenKind::OrOr));
        assert_eq!(TokenKind::from_keyword("lamid"), Some(TokenKind::EqualEqual));
        assert_eq!(TokenKind::from_keyword("weyn"), Some(TokenKind::Greater));
        assert_eq!(
            TokenKind::from_keyword("yar_lamid"),
            Some(TokenKind::LessEqual)
        );
    }

    #[test]
    fn test_embedded_c_markers() {
        assert_eq!(TokenKind::from_keyword("__C_CODE__"), Some(TokenKind::CCode));
        assert_eq!(TokenKind::from_keyword("__C_CALL__"), Some(TokenKind::CCall));
    }

    #[test]
    fn test_literal_kinds_carry_values() {
        let kind = TokenKind::Str("salaan".to_string());
        assert!(matches!(kind, TokenKind::Str(ref s) if s == "salaan"));
        assert!(matches!(TokenKind::Int(7), TokenKind::Int(7)));
    }
}
