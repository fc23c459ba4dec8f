#![allow(dead_code)]

use certeval::evaluator::{GenerationOutcome, TextGenerator};
use std::fs;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// In-process provider that replays a fixed list of outcomes.
pub struct ScriptedGenerator {
    name: String,
    outcomes: Mutex<Vec<GenerationOutcome>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(name: &str, mut outcomes: Vec<GenerationOutcome>) -> Arc<Self> {
        outcomes.reverse();
        Arc::new(Self {
            name: name.to_string(),
            outcomes: Mutex::new(outcomes),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn answering(name: &str, answers: &[&str]) -> Arc<Self> {
        Self::new(
            name,
            answers
                .iter()
                .map(|a| GenerationOutcome::Text(a.to_string()))
                .collect(),
        )
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        _credential: &'a str,
    ) -> Pin<Box<dyn Future<Output = GenerationOutcome> + Send + 'a>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self
            .outcomes
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| GenerationOutcome::Error("script exhausted".to_string()));
        Box::pin(async move { next })
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn get_model_name(&self) -> &str {
        "scripted"
    }
}

pub const DATASET: &str = "Notebooks";
pub const PRODUCT: &str = "ThinkBook 14";

pub const MANDATES: &str = "Certification,Mandate Number,Mandate title,Mandate Description\n\
TCO,1,Energy consumption,The product must meet Energy Star 8.0 energy requirements.\n\
TCO,2,Weight,Portable products must weigh less than 3 kg.\n\
EPEAT,1,Battery,Batteries must be replaceable by the user.\n";

pub const RELEVANCE: &str = "Certification,Mandate Number,Column Name Raw,Column Name,Column Rank\n\
TCO,1,TEC.77,Typical energy consumption,1\n\
TCO,2,Weight.12,Weight,1\n\
TCO,2,Color.3,Color,2\n";

pub const PRODUCTS: &str = "id,name,category_id,category_label,Sustainability certificates.42513,TEC.77,TEC.77.unit,Weight.12,Weight.12.unit,Color.3\n\
17,ThinkBook 14,3,Notebooks,TCO Certified,15.2,kWh,1.4,kg,Grey\n\
18,IdeaPad 5,3,Notebooks,,nan,,1.9,kg,\n";

pub const COLUMN_SUMMARY: &str = "column_cleaned,column_values,column_unit,column_min,column_max\n\
Weight,\"['1.4', '1.9']\",kg,0.9,2.7\n\
Color,\"['Grey', 'Black']\",N/A,N/A,N/A\n";

pub const DICTIONARY: &str = "Product Category,Column Name Raw,Column Name,Column Top Values,Column Unit,Column Min,Column Max,Column Definition,Approved\n\
Notebooks,id,id,,,,,,False\n\
Notebooks,Weight.12,Weight,\"['1.4', '1.9']\",kg,0.9,2.7,,False\n\
Notebooks,Color.3,Color,\"['Grey', 'Black']\",,,,,False\n";

/// Writes a complete working directory under `root`.
pub fn write_workspace(root: &Path) {
    write(
        &root.join("file_list.csv"),
        &format!(
            "file_folder,file_name,file_description,added\n{},Datasets/{}/products.csv,Notebook and laptop listings from the catalog,2024-01-05 10:00:00.000000\n",
            DATASET, DATASET
        ),
    );
    write(
        &root.join("Datasets").join(DATASET).join("products.csv"),
        PRODUCTS,
    );

    let certification = root.join("Product Certification");
    write(&certification.join("certification_mandates_revised.csv"), MANDATES);
    write(
        &certification
            .join(DATASET)
            .join("mandate_column_relevance_full.csv"),
        RELEVANCE,
    );

    let dictionary = root.join("Data Dictionary Output").join(DATASET);
    write(&dictionary.join("columns_summary.csv"), COLUMN_SUMMARY);
    write(
        &dictionary.join(format!("{}_Data_Dictionary.csv", DATASET)),
        DICTIONARY,
    );
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}
