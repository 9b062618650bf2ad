//! Step layout of the CRAS intake form

use super::field::{FieldKind, FieldSpec};
use super::step::StepIndex;

/// Name of the hidden anti-forgery field owned by the host form
pub const TOKEN_FIELD: &str = "csrfmiddlewaretoken";

const YES_NO: &[&str] = &["Sim", "Não"];

const SEXO: &[&str] = &["Masculino", "Feminino", "Outro"];

const ESTADO_CIVIL: &[&str] = &[
    "Solteiro(a)",
    "Casado(a)",
    "Divorciado(a)",
    "Viúvo(a)",
    "União Estável",
];

const NIVEL_FORMACAO: &[&str] = &[
    "Ensino Fundamental Incompleto",
    "Ensino Fundamental Completo",
    "Ensino Médio Incompleto",
    "Ensino Médio Completo",
    "Ensino Superior Incompleto",
    "Ensino Superior Completo",
    "Pós-Graduação Incompleta",
    "Pós-Graduação Completa",
    "Mestrado Incompleto",
    "Mestrado Completo",
    "Doutorado Incompleto",
    "Doutorado Completo",
    "Nenhum",
];

const BENEFICIO_SOCIAL: &[&str] = &[
    "Bolsa Família",
    "Auxílio Brasil",
    "BPC - Benefício de Prestação Continuada",
    "Auxilio por Incapacidade Temporária",
    "Auxilio por Incapacidade Permanente",
    "Outro",
    "Nenhum",
];

const UF: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Ordered set of fields, each assigned to one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLayout {
    fields: Vec<FieldSpec>,
}

impl FormLayout {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// The six-step CRAS registration form
    pub fn cras() -> Self {
        use FieldKind::*;

        let s1 = StepIndex::clamped(1);
        let s2 = StepIndex::clamped(2);
        let s3 = StepIndex::clamped(3);
        let s4 = StepIndex::clamped(4);
        let s5 = StepIndex::clamped(5);
        let s6 = StepIndex::clamped(6);

        Self::new(vec![
            // Dados Pessoais
            FieldSpec::new("nome", "Nome Completo", s1, Text).required(),
            FieldSpec::new("email", "E-mail", s1, Email),
            FieldSpec::new("telefone", "Telefone", s1, Phone).required(),
            FieldSpec::new("data-nascimento", "Data de Nascimento", s1, Date).required(),
            FieldSpec::select("sexo", "Sexo", s1, SEXO).required(),
            // Documentação
            FieldSpec::new("cpf", "CPF", s2, Cpf).required(),
            FieldSpec::new("rg", "RG", s2, Rg),
            FieldSpec::new("data-emissao", "Data de Emissão do RG", s2, IssueDate).required(),
            FieldSpec::select("orgao-emissor", "Órgão Emissor (UF)", s2, UF).required(),
            // Endereço
            FieldSpec::new("endereco", "Endereço", s3, Text).required(),
            FieldSpec::new("bairro", "Bairro", s3, Text).required(),
            FieldSpec::new("referencia", "Ponto de Referência", s3, Text),
            // Informações Familiares
            FieldSpec::select("estado-civil", "Estado Civil", s4, ESTADO_CIVIL).required(),
            FieldSpec::new("mae", "Nome da Mãe", s4, Text).required(),
            FieldSpec::new("pai", "Nome do Pai", s4, Text),
            FieldSpec::select("nivel-formacao", "Nível de Formação", s4, NIVEL_FORMACAO),
            FieldSpec::new("profissao", "Profissão", s4, Text),
            // Situação Socioeconômica
            FieldSpec::new("renda", "Renda Mensal", s5, Currency).required(),
            FieldSpec::select("deficiente", "Possui Deficiência?", s5, YES_NO).required(),
            FieldSpec::new("deficiencia", "Qual Deficiência?", s5, Text).required(),
            FieldSpec::select("familia-cad-unico", "Família no CadÚnico?", s5, YES_NO).required(),
            FieldSpec::select("beneficio-social", "Benefício Social", s5, BENEFICIO_SOCIAL),
            FieldSpec::select("aposentadoria", "Aposentado(a)?", s5, YES_NO).required(),
            // Benefícios e Documentos
            FieldSpec::select("passe-intermunicipal", "Passe Intermunicipal", s6, YES_NO)
                .required(),
            FieldSpec::select("passe-interestadual", "Passe Interestadual", s6, YES_NO).required(),
            FieldSpec::select("carteira-autista", "Carteira de Autista", s6, YES_NO).required(),
            FieldSpec::select("livre-cultura", "Livre Cultura", s6, YES_NO),
            FieldSpec::select("laudo", "Possui Laudo Médico?", s6, YES_NO).required(),
            FieldSpec::new("observacao", "Laudo Médico (PDF)", s6, Attachment).required(),
        ])
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Fields of one step, in layout order
    pub fn fields_in(&self, step: StepIndex) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(move |f| f.step == step)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.field(name).map(|f| f.kind)
    }
}

impl Default for FormLayout {
    fn default() -> Self {
        Self::cras()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TOTAL_STEPS;
    use std::collections::HashSet;

    #[test]
    fn test_every_step_has_fields() {
        let layout = FormLayout::cras();
        for step in StepIndex::all() {
            assert!(layout.fields_in(step).count() > 0, "step {step} is empty");
        }
    }

    #[test]
    fn test_field_names_are_unique() {
        let layout = FormLayout::cras();
        let names: HashSet<&str> = layout.fields().iter().map(|f| f.name).collect();
        assert_eq!(names.len(), layout.fields().len());
    }

    #[test]
    fn test_token_field_is_not_in_layout() {
        assert!(FormLayout::cras().field(TOKEN_FIELD).is_none());
    }

    #[test]
    fn test_selects_have_options() {
        let layout = FormLayout::cras();
        for field in layout.fields() {
            if field.kind == FieldKind::Select {
                assert!(!field.options.is_empty(), "{} has no options", field.name);
            }
        }
    }

    #[test]
    fn test_last_step_holds_report_fields() {
        let layout = FormLayout::cras();
        let last: Vec<&str> = layout
            .fields_in(StepIndex::clamped(TOTAL_STEPS))
            .map(|f| f.name)
            .collect();
        assert!(last.contains(&"laudo"));
        assert!(last.contains(&"observacao"));
    }

    #[test]
    fn test_kind_of() {
        let layout = FormLayout::cras();
        assert_eq!(layout.kind_of("cpf"), Some(FieldKind::Cpf));
        assert_eq!(layout.kind_of("renda"), Some(FieldKind::Currency));
        assert!(layout.kind_of("missing").is_none());
    }
}
