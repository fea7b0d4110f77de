//! Noyau — évaluation (pipeline réel)
//!
//! découpage -> affectation -> jetons -> complétion -> RPN -> double évaluation -> environnement
//!
//! Une entrée peut contenir plusieurs instructions (séparées par ';') : elles sont
//! exécutées dans l’ordre, la première erreur arrête les suivantes (les précédentes
//! restent acquises).

use super::affectation::resoudre;
use super::completion::completer;
use super::decoupage::decouper;
use super::environnement::{Environnement, NOM_SYSTEME};
use super::erreur::{ErreurCalcul, ResultatCalcul};
use super::format::formater;
use super::jetons::{format_jetons, tokenize};
use super::registre::Registre;
use super::reglages::{Reglages, PRECISION_MAX, PRECISION_MIN, PREFIXE_COMMANDE};
use super::rpn::{format_rpn, to_rpn};
use super::valeur::Valeur;
use super::verification::evaluer_verifie;

/// Issue d’une instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Issue {
    /// Résultat rangé dans "_" (et la cible)
    Valeur,
    /// Rien à afficher (instruction vide, suppression)
    Silence,
}

pub struct Calculatrice {
    reglages: Reglages,
    registre: Registre,
    env: Environnement,
    erreur: Option<ErreurCalcul>,
    silencieux: bool,
}

impl Default for Calculatrice {
    fn default() -> Self {
        Self::new(Reglages::default())
    }
}

impl Calculatrice {
    pub fn new(reglages: Reglages) -> Self {
        let reglages = reglages.normalise();
        let registre = Registre::depuis_reglages(&reglages);
        let env = Environnement::nouveau(&reglages.nom_reponse);
        tracing::debug!(jetons = registre.len(), precision = reglages.precision, "calculatrice prête");

        Self {
            reglages,
            registre,
            env,
            erreur: None,
            silencieux: true,
        }
    }

    pub fn reglages(&self) -> &Reglages {
        &self.reglages
    }

    /// Nouvelle précision de session, bornée.
    pub fn changer_precision(&mut self, precision: u32) {
        self.reglages.precision = precision.clamp(PRECISION_MIN, PRECISION_MAX);
    }

    /// Efface toutes les variables utilisateur et la dernière réponse.
    pub fn reinitialiser(&mut self) {
        self.env = Environnement::nouveau(&self.reglages.nom_reponse);
        self.erreur = None;
        self.silencieux = true;
    }

    /// Exécute une entrée ; le résultat (ou l’erreur) est lu avec `reponse`.
    #[tracing::instrument(skip(self))]
    pub fn calculer(&mut self, entree: &str) {
        self.silencieux = true;

        let instructions = match decouper(entree, &self.reglages) {
            Ok(i) => i,
            Err(err) => {
                tracing::debug!(erreur = %err, "découpage refusé");
                self.erreur = Some(err);
                return;
            }
        };

        for mots in instructions {
            match self.instruction(mots) {
                Ok(issue) => {
                    self.erreur = None;
                    self.silencieux = issue == Issue::Silence;
                }
                Err(err) => {
                    tracing::debug!(erreur = %err, categorie = ?err.categorie(), "instruction refusée");
                    self.erreur = Some(err);
                    self.silencieux = false;
                    return;
                }
            }
        }
    }

    fn instruction(&mut self, mots: Vec<String>) -> ResultatCalcul<Issue> {
        if mots.is_empty() {
            return Ok(Issue::Silence);
        }
        tracing::debug!(mots = ?mots, "mots");

        if mots.len() > 1 && mots[0] == PREFIXE_COMMANDE {
            return self.commande(&mots[1..]);
        }

        let affectation = resoudre(mots, &self.registre, &self.env, &self.reglages.nom_reponse)?;

        let jetons = tokenize(&affectation.mots, &self.registre, &self.env, &self.reglages)?;
        tracing::debug!(jetons = %format_jetons(&jetons), "jetons");

        let infixe = completer(jetons, &self.registre)?;
        tracing::debug!(infixe = %format_jetons(&infixe), "infixe complété");

        let rpn = to_rpn(infixe)?;
        tracing::debug!(rpn = %format_rpn(&rpn), "rpn");

        let valeur = evaluer_verifie(
            &rpn,
            self.reglages.contexte(),
            self.reglages.contexte_verification(),
        )?;
        valeur.verifier_connue()?;

        self.env.lier(NOM_SYSTEME, valeur.clone());
        self.env.lier(&affectation.cible, valeur);
        Ok(Issue::Valeur)
    }

    /// /d nom, /l, /l f, /l u, /h nom
    fn commande(&mut self, mots: &[String]) -> ResultatCalcul<Issue> {
        let argument = mots[1..].join(" ");

        let texte = match (mots[0].as_str(), argument.as_str()) {
            ("d", nom) => {
                if !nom.is_empty() && !self.env.supprimer(nom) {
                    tracing::debug!(nom, "suppression d’une variable absente");
                }
                return Ok(Issue::Silence);
            }
            ("l", "") => self
                .variables()
                .into_iter()
                .map(|(nom, valeur)| format!("{nom} = {valeur}"))
                .collect::<Vec<_>>()
                .join("\n"),
            ("l", "f") => self.registre.noms_fonctions().join(" "),
            ("l", "u") => self.registre.noms_unites().join(" "),
            ("h", nom) => self
                .registre
                .aide(nom)
                .filter(|a| !a.is_empty())
                .map_or_else(|| format!("pas d’aide pour '{nom}'"), |a| format!("{nom} : {a}")),
            (autre, _) => return Err(ErreurCalcul::CommandeInconnue(autre.to_string())),
        };

        self.env.lier(NOM_SYSTEME, Valeur::Texte(texte));
        Ok(Issue::Valeur)
    }

    /// (erreur ?, texte) : message d’erreur, ou réponse formatée ("" si silencieux).
    pub fn reponse(&self) -> (bool, String) {
        if let Some(err) = &self.erreur {
            return (true, err.to_string());
        }
        if self.silencieux {
            return (false, String::new());
        }
        let texte = self
            .env
            .valeur(NOM_SYSTEME)
            .map(|v| formater(v, &self.reglages))
            .unwrap_or_default();
        (false, texte)
    }

    pub fn est_silencieux(&self) -> bool {
        self.silencieux && self.erreur.is_none()
    }

    pub fn erreur(&self) -> Option<&ErreurCalcul> {
        self.erreur.as_ref()
    }

    pub fn valeur(&self, nom: &str) -> Option<&Valeur> {
        self.env.valeur(nom)
    }

    /// Variables utilisateur (et réponse), formatées, triées par nom.
    pub fn variables(&self) -> Vec<(String, String)> {
        self.env
            .variables()
            .into_iter()
            .map(|(nom, v)| (nom.to_string(), formater(v, &self.reglages)))
            .collect()
    }
}
