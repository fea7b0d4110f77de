// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// - Clavier : Enter évalue (quand le champ a le focus)
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
// - Historique cliquable + table des variables repliable
//
// Note : pas de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use super::etat::AppCalc;
use crate::noyau::reglages::{PRECISION_MAX, PRECISION_MIN};

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_reponse(ui);

                ui.add_space(8.0);
                ui.separator();

                self.ui_variables(ui);
                self.ui_historique(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: x = 3 km + 500 m; x : 2 s")
                .id_source("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // TextEdit singleline perd le focus sur Enter : on teste lost_focus.
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (resp.has_focus() || resp.lost_focus()) && enter {
            self.evaluer();
        }

        ui.add_space(6.0);

        // Contrat: C = entrée seulement ; CLR = résultats seulement ; AC = tout
        ui.horizontal(|ui| {
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(ui, "CLR", "Efface la réponse et l’erreur", Action::ClearResultats);
            self.bouton_action(ui, "AC", "Remise à zéro totale (variables comprises)", Action::ResetTotal);

            ui.separator();

            ui.label("Précision :");
            let mut p = self.precision;
            let resp = ui.add(
                egui::DragValue::new(&mut p)
                    .speed(1)
                    .range(PRECISION_MIN..=PRECISION_MAX)
                    .suffix(" chiffres"),
            );
            if resp.changed() {
                self.set_precision(p);
            }
        });

        ui.add_space(8.0);

        // Touches rapides + "="
        ui.horizontal_wrapped(|ui| {
            for op in ["(", ")", "[", "]", ",", "+", "-", "*", ":", "/", "^", "!", "="] {
                self.bouton_insert(ui, op, op, Insertion::Symbole);
            }

            ui.separator();

            for mot in ["pi", "ans", "x", "km", "s", "deg"] {
                self.bouton_insert(ui, mot, mot, Insertion::Mot);
            }
            for f in ["sqrt", "sin", "cos", "tan", "ln", "log"] {
                self.bouton_insert(ui, f, f, Insertion::Mot);
            }

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 32.0], egui::Button::new("↵"));
            if eq.on_hover_text("Évaluer").clicked() {
                self.evaluer();
            }
        });

        ui.add_space(8.0);

        self.ui_pave_numerique(ui);
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for rangee in [["7", "8", "9"], ["4", "5", "6"], ["1", "2", "3"]] {
                    for c in rangee {
                        self.bouton_insert(ui, c, c, Insertion::Chiffre);
                    }
                    match rangee[0] {
                        "7" => self.bouton_action(ui, "DEL", "Efface le dernier caractère", Action::Backspace),
                        "4" => self.bouton_insert(ui, ";", ";", Insertion::Symbole),
                        _ => self.bouton_insert(ui, ".", ".", Insertion::Chiffre),
                    }
                    ui.end_row();
                }

                self.bouton_insert(ui, "0", "0", Insertion::Chiffre);
                ui.label("");
                ui.label("");
                ui.label("");
                ui.end_row();
            });
    }

    fn ui_reponse(&mut self, ui: &mut egui::Ui) {
        ui.label("Réponse :");
        Self::champ_monospace(ui, "reponse_out", &self.reponse, 2);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_variables(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Variables")
            .default_open(false)
            .show(ui, |ui| {
                egui::Grid::new("table_variables")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (nom, valeur) in self.calc.variables() {
                            ui.monospace(nom);
                            ui.monospace(valeur);
                            ui.end_row();
                        }
                    });
            });
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        let mut reprise = None;

        egui::CollapsingHeader::new("Historique")
            .default_open(true)
            .show(ui, |ui| {
                for (i, ligne) in self.historique.iter().enumerate().rev() {
                    ui.horizontal(|ui| {
                        if ui.small_button("↑").on_hover_text("Reprendre").clicked() {
                            reprise = Some(i);
                        }
                        ui.monospace(&ligne.entree);
                        if ligne.erreur {
                            ui.colored_label(ui.visuals().error_fg_color, &ligne.sortie);
                        } else {
                            ui.monospace(format!("= {}", ligne.sortie));
                        }
                    });
                }
            });

        if let Some(i) = reprise {
            self.reprendre(i);
        }
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule, cadre + label monospace.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => {
                    self.entree.pop();
                }
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, a_inserer: &str, genre: Insertion) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if !resp.clicked() {
            return;
        }

        match genre {
            // chiffres : collés
            Insertion::Chiffre => {}
            // symboles et mots : séparés par un espace
            Insertion::Symbole | Insertion::Mot => {
                if !self.entree.is_empty() && !self.entree.ends_with(' ') {
                    self.entree.push(' ');
                }
            }
        }
        self.entree.push_str(a_inserer);
        if genre != Insertion::Chiffre {
            self.entree.push(' ');
        }

        self.focus_entree = true;
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Insertion {
    Chiffre,
    Mot,
    Symbole,
}
