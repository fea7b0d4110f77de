// src/noyau/modules/chem.rs
//
// Masse molaire d’une formule chimique : M "CuSO4*5H2O"
// formule := partie ('*' partie)*
// partie  := coefficient? groupe+
// groupe  := (élément | '(' groupe+ ')' | '[' groupe+ ']') nombre?

use crate::noyau::decimal::{Contexte, Decimal};
use crate::noyau::erreur::{ErreurArith, ResultatArith};
use crate::noyau::jetons::{Jeton, PREC_IMPLICITE};
use crate::noyau::reglages::Reglages;
use crate::noyau::valeur::Valeur;

/// Masses atomiques arrondies (g/mol).
const MASSES: &[(&str, &str)] = &[
    ("H", "1"), ("He", "4"), ("Li", "7"), ("Be", "9"), ("B", "11"), ("C", "12"),
    ("N", "14"), ("O", "16"), ("F", "19"), ("Ne", "20"), ("Na", "23"), ("Mg", "24"),
    ("Al", "27"), ("Si", "28"), ("P", "31"), ("S", "32"), ("Cl", "35.5"), ("Ar", "40"),
    ("K", "39"), ("Ca", "40"), ("Sc", "45"), ("Ti", "48"), ("V", "51"), ("Cr", "52"),
    ("Mn", "55"), ("Fe", "56"), ("Co", "59"), ("Ni", "59"), ("Cu", "64"), ("Zn", "65"),
    ("Ga", "70"), ("Ge", "73"), ("As", "75"), ("Se", "79"), ("Br", "80"), ("Kr", "84"),
    ("Rb", "85"), ("Sr", "88"), ("Y", "89"), ("Zr", "91"), ("Nb", "93"), ("Mo", "96"),
    ("Tc", "98"), ("Ru", "101"), ("Rh", "103"), ("Pd", "106"), ("Ag", "108"), ("Cd", "112"),
    ("In", "115"), ("Sn", "119"), ("Sb", "122"), ("Te", "128"), ("I", "127"), ("Xe", "131"),
    ("Cs", "133"), ("Ba", "137"), ("La", "139"), ("Ce", "140"), ("Pr", "141"), ("Nd", "144"),
    ("Pm", "145"), ("Sm", "150"), ("Eu", "152"), ("Gd", "157"), ("Tb", "159"), ("Dy", "162"),
    ("Ho", "165"), ("Er", "167"), ("Tm", "169"), ("Yb", "173"), ("Lu", "175"), ("Hf", "178"),
    ("Ta", "181"), ("W", "184"), ("Re", "186"), ("Os", "190"), ("Ir", "192"), ("Pt", "195"),
    ("Au", "197"), ("Hg", "201"), ("Tl", "204"), ("Pb", "207"), ("Bi", "209"), ("Po", "209"),
    ("At", "210"), ("Rn", "222"), ("Fr", "223"), ("Ra", "226"), ("Ac", "227"), ("Th", "232"),
    ("Pa", "231"), ("U", "238"), ("Np", "237"), ("Pu", "244"), ("Am", "243"), ("Cm", "247"),
    ("Bk", "247"), ("Cf", "251"), ("Es", "252"), ("Fm", "257"), ("Md", "258"), ("No", "259"),
    ("Lr", "262"), ("Rf", "265"), ("Db", "268"), ("Sg", "271"), ("Bh", "272"), ("Hs", "270"),
    ("Mt", "276"), ("Ds", "281"), ("Rg", "280"), ("Cn", "285"), ("Nh", "284"), ("Fl", "289"),
    ("Mc", "288"), ("Lv", "293"), ("Ts", "294"), ("Og", "294"),
];

fn erreur(formule: &str) -> ErreurArith {
    ErreurArith::Domaine(format!("formule chimique incorrecte : '{formule}'"))
}

struct Lecteur<'a> {
    formule: &'a str,
    car: Vec<char>,
    pos: usize,
    ctx: Contexte,
}

impl<'a> Lecteur<'a> {
    fn new(formule: &'a str, ctx: Contexte) -> Self {
        Self {
            formule,
            car: formule.chars().filter(|c| !c.is_whitespace()).collect(),
            pos: 0,
            ctx,
        }
    }

    fn courant(&self) -> Option<char> {
        self.car.get(self.pos).copied()
    }

    fn nombre(&mut self) -> Option<Decimal> {
        let debut = self.pos;
        while self.courant().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if debut == self.pos {
            return None;
        }
        let texte: String = self.car[debut..self.pos].iter().collect();
        texte.parse().ok()
    }

    fn element(&mut self) -> ResultatArith<Decimal> {
        let debut = self.pos;
        self.pos += 1;
        while self.courant().is_some_and(char::is_lowercase) {
            self.pos += 1;
        }
        let symbole: String = self.car[debut..self.pos].iter().collect();
        MASSES
            .iter()
            .find(|(s, _)| *s == symbole)
            .and_then(|(_, m)| m.parse::<Decimal>().ok())
            .ok_or_else(|| erreur(self.formule))
    }

    /// groupe+ jusqu’à `fin` (fermant attendu) ou '*' / fin de texte
    fn groupes(&mut self, fin: Option<char>) -> ResultatArith<Decimal> {
        let mut somme = Decimal::zero();
        let mut vide = true;

        loop {
            let masse = match self.courant() {
                Some(c) if Some(c) == fin => {
                    self.pos += 1;
                    break;
                }
                None | Some('*') if fin.is_none() => break,
                Some(c @ ('(' | '[')) => {
                    self.pos += 1;
                    self.groupes(Some(if c == '(' { ')' } else { ']' }))?
                }
                Some(c) if c.is_uppercase() => self.element()?,
                _ => return Err(erreur(self.formule)),
            };
            let masse = match self.nombre() {
                Some(n) => masse.mul(&n, self.ctx)?,
                None => masse,
            };
            somme = somme.add(&masse, self.ctx);
            vide = false;
        }

        if vide {
            return Err(erreur(self.formule));
        }
        Ok(somme)
    }

    fn formule(&mut self) -> ResultatArith<Decimal> {
        let mut total = Decimal::zero();
        loop {
            let coefficient = self.nombre().unwrap_or_else(Decimal::un);
            let partie = self.groupes(None)?;
            total = total.add(&partie.mul(&coefficient, self.ctx)?, self.ctx);

            match self.courant() {
                Some('*') => self.pos += 1,
                None => return Ok(total),
                Some(_) => return Err(erreur(self.formule)),
            }
        }
    }
}

pub fn masse_molaire(formule: &str, ctx: Contexte) -> ResultatArith<Decimal> {
    Lecteur::new(formule, ctx).formule()
}

fn masse(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    match v {
        Valeur::Texte(f) => Ok(Valeur::Nombre(masse_molaire(&f, ctx)?)),
        Valeur::NomInconnu(n) => Err(ErreurArith::NomInconnu(n)),
        autre => Err(ErreurArith::TypeInvalide("masse molaire", autre.genre())),
    }
}

pub fn jetons(_reglages: &Reglages) -> Vec<Jeton> {
    vec![Jeton::fonction("M", PREC_IMPLICITE, masse).avec_aide("Masse molaire : M \"H2O\"")]
}
