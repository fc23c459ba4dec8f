use crate::models::{ColumnSummary, Mandate, Product};

/// Most product attributes a compliance prompt carries.
pub const MAX_PROMPT_ATTRIBUTES: usize = 5;

pub struct PromptTemplate;

impl PromptTemplate {
    /// Full compliance prompt: expert instructions around the mandate query.
    pub fn build_compliance_prompt(mandate: &Mandate, product: &Product) -> String {
        format!(
            r#"You are a subject matter expert for assessing the eligibility of IT products for sustainability certifications.
Given the following certification mandate, assess whether the product meets the mandate using the product attributes. Provide
the following as your assessment:

- Recommendation: TRUE if the product is compliant, FALSE if the product is not compliant or if more information is needed

- Reasoning: Your reasoning for the recommendation.

{}

If there is not enough information provided, respond with "MORE INFO NEEDED" and your reasoning.
"#,
            Self::build_mandate_query(mandate, product)
        )
    }

    /// Mandate header, product header, up to five relevant attributes and the
    /// closing question. Columns the product lacks or leaves empty are skipped.
    pub fn build_mandate_query(mandate: &Mandate, product: &Product) -> String {
        let mut query = format!(
            "MANDATE\n\n{} Certification\nMandate {}: {}",
            mandate.certification, mandate.number, mandate.title
        );
        query.push_str(&format!(
            "\nMandate Description: \n{}",
            mandate.description
        ));
        query.push_str(&format!(
            "\n\nPRODUCT\n\nName: {} ({})",
            product.name, product.category_label
        ));

        query.push('\n');
        for line in Self::attribute_lines(mandate, product) {
            query.push_str(&line);
            query.push('\n');
        }

        query.push_str(&format!(
            "\nIs the product \"{}\" compliant with the {} Certification Mandate {}: {}?",
            product.name, mandate.certification, mandate.number, mandate.title
        ));
        query
    }

    fn attribute_lines(mandate: &Mandate, product: &Product) -> Vec<String> {
        mandate
            .relevant_columns
            .iter()
            .filter_map(|column| {
                let value = product.display_value(&column.raw_column_name)?;
                let unit = product
                    .unit(&column.raw_column_name)
                    .map(|unit| format!(" {}", unit))
                    .unwrap_or_default();
                Some(format!("{}: {}{}", column.display_name, value, unit))
            })
            .take(MAX_PROMPT_ATTRIBUTES)
            .collect()
    }

    /// Request for a column definition returned as a small JSON object.
    pub fn build_definition_prompt(summary: &ColumnSummary, dataset_description: &str) -> String {
        let unit = summary.unit().unwrap_or_default();
        let range = match summary.range() {
            Some((min, max)) => format!(
                "MIN VALUE: {} {}\n\nMAX VALUE: {} {}\n\n",
                min, unit, max, unit
            ),
            None => "\n".to_string(),
        };

        format!(
            r#"Given the following dataset file description, column name, and example values, please generate a column definition which is at least three sentences long and 100 characters in length. Generate this in dictionary format.

DATASET FILE DESCRIPTION: {description}

COLUMN NAME: {column}

EXAMPLE VALUES: {values} {unit}
{range}
Given below is XML that describes the information to extract from this document and the tags to extract it into.

<output>
    <string name="column_name" description="Name of the column in the data file"/>
    <string name="definition" format="min_length: min=100" description="Definition for the column"/>
</output>

ONLY return a valid JSON object (no other text is necessary), where the key of the field in JSON is the `name` attribute of the corresponding XML, and the value is of the type specified by the corresponding XML's tag. The JSON MUST conform to the XML format, including any types and format requests e.g. requests for lists, objects and specific types. Be correct and concise.

Here are examples of simple (XML, JSON) pairs that show the expected behavior:
- `<string name='foo' format='two-words lower-case' />` => `{{'foo': 'example one'}}`
- `<list name='bar'><string format='upper-case' /></list>` => `{{"bar": ['STRING ONE', 'STRING TWO', etc.]}}`
- `<object name='baz'><string name="foo" format="capitalize two-words" /><integer name="index" format="1-indexed" /></object>` => `{{'baz': {{'foo': 'Some String', 'index': 1}}}}`
"#,
            description = dataset_description,
            column = summary.column_cleaned,
            values = summary.column_values,
            unit = unit,
            range = range,
        )
    }
}
