//! SMILES reader behind [`super::BasicToolkit`].
//!
//! Reads the organic subset, bracket atoms, bonds, branches, ring closures and
//! disconnections into a small molecular graph, keeping the token stream so a
//! standard form can be written back in input order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static BRACKET_ATOM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<isotope>\d+)?",
        r"(?P<symbol>[A-Z][a-z]?|se|as|te|[bcnops]|\*)",
        r"(?P<chiral>@(?:@|TH[12]|AL[12]|SP[123]|TB\d{1,2}|OH\d{1,2})?)?",
        r"(?P<hcount>H\d?)?",
        r"(?P<charge>[+-]+\d*)?",
        r"(?::(?P<class>\d+))?$",
    ))
    .expect("bracket atom pattern")
});

const ELEMENTS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

const MAX_CHARGE: i8 = 15;

/// Default valences of the organic subset.
fn organic_valences(symbol: &str) -> Option<&'static [u8]> {
    match symbol {
        "B" => Some(&[3]),
        "C" => Some(&[4]),
        "N" => Some(&[3, 5]),
        "O" => Some(&[2]),
        "P" => Some(&[3, 5]),
        "S" => Some(&[2, 4, 6]),
        "F" | "Cl" | "Br" | "I" => Some(&[1]),
        _ => None,
    }
}

/// Implicit hydrogens of an organic-subset atom, `None` on a valence violation.
fn organic_hydrogens(symbol: &str, aromatic: bool, bond_sum: u8) -> Option<u8> {
    if symbol == "*" {
        return Some(0);
    }
    let valence = organic_valences(symbol)?
        .iter()
        .copied()
        .find(|&v| v >= bond_sum)?;
    if aromatic {
        Some(valence.saturating_sub(bond_sum).saturating_sub(1))
    } else {
        Some(valence - bond_sum)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    fn from_symbol(symbol: u8) -> Self {
        match symbol {
            b'=' => Self::Double,
            b'#' => Self::Triple,
            b'$' => Self::Quadruple,
            b':' => Self::Aromatic,
            _ => Self::Single,
        }
    }

    /// Contribution to an atom's valence. Aromatic bonds count once; the
    /// shared electron is accounted for in [`organic_hydrogens`].
    fn valence(self) -> u8 {
        match self {
            Self::Single | Self::Aromatic => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Quadruple => 4,
        }
    }
}

/// Properties only a bracket atom can carry. Isotope and chirality are read
/// but not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BracketProps {
    pub hydrogens: u8,
    pub charge: i8,
    pub class: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Atom {
    /// Element symbol in its capitalised form, `*` for a wildcard.
    pub element: String,
    pub aromatic: bool,
    pub bracket: Option<BracketProps>,
    /// Implicit hydrogens; only meaningful for organic-subset atoms.
    pub implicit_hydrogens: u8,
}

impl Atom {
    pub fn hydrogens(&self) -> u8 {
        match self.bracket {
            Some(props) => props.hydrogens,
            None => self.implicit_hydrogens,
        }
    }

    pub fn is_heavy(&self) -> bool {
        self.element != "H" && self.element != "*"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bond {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Atom(usize),
    Bond { symbol: u8, after_aromatic: bool },
    Dot,
    Open,
    Close,
    Ring(u32),
}

/// A parsed structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedSmiles {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    tokens: Vec<Token>,
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    tokens: Vec<Token>,
    prev: Option<usize>,
    pending: Option<u8>,
    branches: Vec<Option<usize>>,
    rings: HashMap<u32, (usize, Option<u8>)>,
}

/// Parse a SMILES string. `None` if it is not a valid structure.
pub(crate) fn parse(input: &str) -> Option<ParsedSmiles> {
    let input = input.trim();
    if input.is_empty() || !input.is_ascii() {
        return None;
    }
    let mut reader = Reader {
        input,
        pos: 0,
        atoms: Vec::new(),
        bonds: Vec::new(),
        tokens: Vec::new(),
        prev: None,
        pending: None,
        branches: Vec::new(),
        rings: HashMap::new(),
    };
    reader.read()?;
    reader.finish()
}

impl Reader<'_> {
    fn read(&mut self) -> Option<()> {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() {
            let c = bytes[self.pos];
            match c {
                b'(' => {
                    if self.prev.is_none() || self.pending.is_some() {
                        return None;
                    }
                    self.branches.push(self.prev);
                    self.tokens.push(Token::Open);
                    self.pos += 1;
                }
                b')' => {
                    if self.pending.is_some() || matches!(self.tokens.last(), Some(Token::Open)) {
                        return None;
                    }
                    self.prev = self.branches.pop()?;
                    self.tokens.push(Token::Close);
                    self.pos += 1;
                }
                b'-' | b'=' | b'#' | b'$' | b':' | b'/' | b'\\' => {
                    let prev = self.prev?;
                    if self.pending.is_some() {
                        return None;
                    }
                    self.pending = Some(c);
                    self.tokens.push(Token::Bond {
                        symbol: c,
                        after_aromatic: self.atoms[prev].aromatic,
                    });
                    self.pos += 1;
                }
                b'.' => {
                    if self.prev.is_none() || self.pending.is_some() {
                        return None;
                    }
                    self.prev = None;
                    self.tokens.push(Token::Dot);
                    self.pos += 1;
                }
                b'0'..=b'9' | b'%' => self.ring_closure()?,
                b'[' => self.bracket_atom()?,
                _ => self.organic_atom()?,
            }
        }
        Some(())
    }

    fn finish(mut self) -> Option<ParsedSmiles> {
        if self.atoms.is_empty()
            || self.pending.is_some()
            || !self.branches.is_empty()
            || !self.rings.is_empty()
            || matches!(self.tokens.last(), Some(Token::Dot))
        {
            return None;
        }

        let mut bond_sums = vec![0u8; self.atoms.len()];
        for bond in &self.bonds {
            bond_sums[bond.a] = bond_sums[bond.a].saturating_add(bond.order.valence());
            bond_sums[bond.b] = bond_sums[bond.b].saturating_add(bond.order.valence());
        }
        for (atom, sum) in self.atoms.iter_mut().zip(bond_sums) {
            if atom.bracket.is_none() {
                atom.implicit_hydrogens = organic_hydrogens(&atom.element, atom.aromatic, sum)?;
            }
        }

        Some(ParsedSmiles {
            atoms: self.atoms,
            bonds: self.bonds,
            tokens: self.tokens,
        })
    }

    fn ring_closure(&mut self) -> Option<()> {
        let bytes = self.input.as_bytes();
        let (number, width) = if bytes[self.pos] == b'%' {
            let digits = self.input.get(self.pos + 1..self.pos + 3)?;
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            (digits.parse::<u32>().ok()?, 3)
        } else {
            (u32::from(bytes[self.pos] - b'0'), 1)
        };

        let atom = self.prev?;
        let bond = self.pending.take();
        match self.rings.remove(&number) {
            Some((other, opened_with)) => {
                if other == atom {
                    return None;
                }
                let symbol = match (opened_with, bond) {
                    (Some(a), Some(b))
                        if BondOrder::from_symbol(a) != BondOrder::from_symbol(b) =>
                    {
                        return None
                    }
                    (Some(a), _) => Some(a),
                    (None, b) => b,
                };
                self.add_bond(other, atom, symbol)?;
            }
            None => {
                self.rings.insert(number, (atom, bond));
            }
        }
        self.tokens.push(Token::Ring(number));
        self.pos += width;
        Some(())
    }

    fn organic_atom(&mut self) -> Option<()> {
        let rest = &self.input[self.pos..];
        let (element, aromatic, width) = if rest.starts_with("Cl") {
            ("Cl", false, 2)
        } else if rest.starts_with("Br") {
            ("Br", false, 2)
        } else {
            match rest.as_bytes()[0] {
                b'B' => ("B", false, 1),
                b'C' => ("C", false, 1),
                b'N' => ("N", false, 1),
                b'O' => ("O", false, 1),
                b'P' => ("P", false, 1),
                b'S' => ("S", false, 1),
                b'F' => ("F", false, 1),
                b'I' => ("I", false, 1),
                b'b' => ("B", true, 1),
                b'c' => ("C", true, 1),
                b'n' => ("N", true, 1),
                b'o' => ("O", true, 1),
                b'p' => ("P", true, 1),
                b's' => ("S", true, 1),
                b'*' => ("*", false, 1),
                _ => return None,
            }
        };
        self.pos += width;
        self.push_atom(Atom {
            element: element.to_string(),
            aromatic,
            bracket: None,
            implicit_hydrogens: 0,
        })
    }

    fn bracket_atom(&mut self) -> Option<()> {
        let close = self.input[self.pos..].find(']')? + self.pos;
        let body = &self.input[self.pos + 1..close];
        let caps = BRACKET_ATOM.captures(body)?;

        let raw_symbol = caps.name("symbol")?.as_str();
        let aromatic = raw_symbol.starts_with(|c: char| c.is_ascii_lowercase());
        let element = if aromatic {
            capitalize(raw_symbol)
        } else {
            raw_symbol.to_string()
        };
        if element != "*" && !ELEMENTS.contains(&element.as_str()) {
            return None;
        }

        let hydrogens = match caps.name("hcount").map(|m| m.as_str()) {
            None => 0,
            Some("H") => 1,
            Some(h) => h[1..].parse().ok()?,
        };
        let charge = match caps.name("charge") {
            None => 0,
            Some(m) => parse_charge(m.as_str())?,
        };
        let class = match caps.name("class") {
            None => None,
            Some(m) => Some(m.as_str().parse().ok()?),
        };

        self.pos = close + 1;
        self.push_atom(Atom {
            element,
            aromatic,
            bracket: Some(BracketProps {
                hydrogens,
                charge,
                class,
            }),
            implicit_hydrogens: 0,
        })
    }

    fn push_atom(&mut self, atom: Atom) -> Option<()> {
        let index = self.atoms.len();
        self.atoms.push(atom);
        if let Some(prev) = self.prev {
            let symbol = self.pending.take();
            self.add_bond(prev, index, symbol)?;
        }
        self.prev = Some(index);
        self.tokens.push(Token::Atom(index));
        Some(())
    }

    fn add_bond(&mut self, a: usize, b: usize, symbol: Option<u8>) -> Option<()> {
        let duplicate = self
            .bonds
            .iter()
            .any(|bond| (bond.a == a && bond.b == b) || (bond.a == b && bond.b == a));
        if duplicate {
            return None;
        }
        let order = match symbol {
            Some(s) => BondOrder::from_symbol(s),
            None if self.atoms[a].aromatic && self.atoms[b].aromatic => BondOrder::Aromatic,
            None => BondOrder::Single,
        };
        self.bonds.push(Bond { a, b, order });
        Some(())
    }
}

fn capitalize(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `+`, `++`, `+2`, `-`, `---`, `-3`.
fn parse_charge(text: &str) -> Option<i8> {
    let sign: i8 = if text.starts_with('+') { 1 } else { -1 };
    let signs = text.chars().take_while(|c| *c == '+' || *c == '-').count();
    let marks = &text[..signs];
    let digits = &text[signs..];
    if marks.chars().any(|c| (c == '+') != (sign > 0)) {
        return None;
    }
    let magnitude: i8 = if digits.is_empty() {
        i8::try_from(signs).ok()?
    } else {
        if signs != 1 {
            return None;
        }
        digits.parse().ok()?
    };
    if magnitude > MAX_CHARGE {
        return None;
    }
    Some(sign * magnitude)
}

impl ParsedSmiles {
    /// Write the structure back without stereo or isotope labels, dropping
    /// brackets from atoms the organic subset can express.
    pub fn to_standard_smiles(&self) -> String {
        let bond_sums = self.bond_sums();
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Atom(index) => {
                    out.push_str(&self.atom_text(*index, bond_sums[*index]));
                }
                Token::Bond {
                    symbol: b'/' | b'\\',
                    after_aromatic,
                } => {
                    if *after_aromatic {
                        out.push('-');
                    }
                }
                Token::Bond { symbol, .. } => out.push(char::from(*symbol)),
                Token::Dot => out.push('.'),
                Token::Open => out.push('('),
                Token::Close => out.push(')'),
                Token::Ring(n) if *n < 10 => out.push_str(&n.to_string()),
                Token::Ring(n) => out.push_str(&format!("%{:02}", n)),
            }
        }
        out
    }

    /// Molecular formula in Hill order.
    pub fn formula(&self) -> String {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        let mut hydrogens = 0u32;
        for atom in &self.atoms {
            if atom.element == "*" {
                continue;
            }
            if atom.element == "H" {
                hydrogens += 1;
            } else {
                *counts.entry(atom.element.as_str()).or_default() += 1;
            }
            hydrogens += u32::from(atom.hydrogens());
        }

        let mut order: Vec<&str> = counts.keys().copied().collect();
        order.sort_unstable();
        let has_carbon = counts.contains_key("C");
        if hydrogens > 0 {
            counts.insert("H", hydrogens);
            if !has_carbon {
                order.push("H");
                order.sort_unstable();
            }
        }
        if has_carbon {
            order.retain(|e| *e != "C");
            let mut hill = vec!["C"];
            if hydrogens > 0 {
                hill.push("H");
            }
            hill.extend(order);
            order = hill;
        }

        order
            .into_iter()
            .map(|element| match counts[element] {
                1 => element.to_string(),
                n => format!("{}{}", element, n),
            })
            .collect()
    }

    pub fn heavy_atoms(&self) -> u32 {
        self.atoms.iter().filter(|a| a.is_heavy()).count() as u32
    }

    fn bond_sums(&self) -> Vec<u8> {
        let mut sums = vec![0u8; self.atoms.len()];
        for bond in &self.bonds {
            sums[bond.a] = sums[bond.a].saturating_add(bond.order.valence());
            sums[bond.b] = sums[bond.b].saturating_add(bond.order.valence());
        }
        sums
    }

    fn atom_text(&self, index: usize, bond_sum: u8) -> String {
        let atom = &self.atoms[index];
        let symbol = if atom.aromatic {
            atom.element.to_lowercase()
        } else {
            atom.element.clone()
        };
        let Some(props) = atom.bracket else {
            return symbol;
        };

        let organic = atom.element == "*" || organic_valences(&atom.element).is_some();
        if organic
            && props.charge == 0
            && props.class.is_none()
            && organic_hydrogens(&atom.element, atom.aromatic, bond_sum) == Some(props.hydrogens)
        {
            return symbol;
        }

        let mut text = format!("[{}", symbol);
        match props.hydrogens {
            0 => {}
            1 => text.push('H'),
            n => text.push_str(&format!("H{}", n)),
        }
        match props.charge {
            0 => {}
            1 => text.push('+'),
            -1 => text.push('-'),
            c if c > 0 => text.push_str(&format!("+{}", c)),
            c => text.push_str(&format!("-{}", -c)),
        }
        if let Some(class) = props.class {
            text.push_str(&format!(":{}", class));
        }
        text.push(']');
        text
    }
}
